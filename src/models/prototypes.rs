//! # 常见晶体原型
//!
//! 按原型名称、元素与晶格常数快速构造结构（sc, bcc, fcc, hcp, diamond,
//! rocksalt, perovskite）。
//!
//! ## 依赖关系
//! - 被 `commands/build.rs` 使用
//! - 使用 `models/structure.rs`, `models/lattice.rs`

use crate::error::{ChemiaError, Result};
use crate::models::{Lattice, Structure};
use std::fmt;
use std::str::FromStr;

/// 支持的原型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prototype {
    SimpleCubic,
    Bcc,
    Fcc,
    Hcp,
    Diamond,
    Rocksalt,
    Perovskite,
}

impl Prototype {
    /// 需要的元素个数
    pub fn num_elements(&self) -> usize {
        match self {
            Prototype::SimpleCubic
            | Prototype::Bcc
            | Prototype::Fcc
            | Prototype::Hcp
            | Prototype::Diamond => 1,
            Prototype::Rocksalt => 2,
            Prototype::Perovskite => 3,
        }
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prototype::SimpleCubic => write!(f, "sc"),
            Prototype::Bcc => write!(f, "bcc"),
            Prototype::Fcc => write!(f, "fcc"),
            Prototype::Hcp => write!(f, "hcp"),
            Prototype::Diamond => write!(f, "diamond"),
            Prototype::Rocksalt => write!(f, "rocksalt"),
            Prototype::Perovskite => write!(f, "perovskite"),
        }
    }
}

impl FromStr for Prototype {
    type Err = ChemiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sc" | "cubic" => Ok(Prototype::SimpleCubic),
            "bcc" => Ok(Prototype::Bcc),
            "fcc" => Ok(Prototype::Fcc),
            "hcp" => Ok(Prototype::Hcp),
            "diamond" => Ok(Prototype::Diamond),
            "rocksalt" | "nacl" => Ok(Prototype::Rocksalt),
            "perovskite" | "abx3" => Ok(Prototype::Perovskite),
            other => Err(ChemiaError::InvalidArgument(format!(
                "Unknown prototype '{}'",
                other
            ))),
        }
    }
}

/// 原型构造参数
#[derive(Debug, Clone)]
pub struct PrototypeParams {
    pub prototype: Prototype,
    pub elements: Vec<String>,
    /// 晶格常数 a (Å)
    pub a: f64,
    /// hcp 的 c (Å)，缺省为理想 c/a = sqrt(8/3)
    pub c: Option<f64>,
    /// 使用惯用晶胞而非原胞（仅影响 bcc/fcc/diamond/rocksalt）
    pub conventional: bool,
}

/// 按原型构造结构
pub fn build(params: &PrototypeParams) -> Result<Structure> {
    let p = params.prototype;
    if params.elements.len() != p.num_elements() {
        return Err(ChemiaError::InvalidArgument(format!(
            "Prototype '{}' needs {} element(s), got {}",
            p,
            p.num_elements(),
            params.elements.len()
        )));
    }
    if params.a <= 0.0 || !params.a.is_finite() {
        return Err(ChemiaError::InvalidArgument(format!(
            "Lattice constant must be positive, got {}",
            params.a
        )));
    }

    let a = params.a;
    let el = |i: usize| params.elements[i].clone();

    let (lattice, atoms): (Lattice, Vec<(String, [f64; 3])>) = match (p, params.conventional) {
        (Prototype::SimpleCubic, _) => (Lattice::cubic(a), vec![(el(0), [0.0, 0.0, 0.0])]),

        (Prototype::Bcc, false) => (bcc_primitive(a), vec![(el(0), [0.0, 0.0, 0.0])]),
        (Prototype::Bcc, true) => (
            Lattice::cubic(a),
            vec![(el(0), [0.0, 0.0, 0.0]), (el(0), [0.5, 0.5, 0.5])],
        ),

        (Prototype::Fcc, false) => (fcc_primitive(a), vec![(el(0), [0.0, 0.0, 0.0])]),
        (Prototype::Fcc, true) => (
            Lattice::cubic(a),
            FCC_BASIS.iter().map(|&f| (el(0), f)).collect(),
        ),

        (Prototype::Hcp, _) => {
            let c = params.c.unwrap_or(a * (8.0_f64 / 3.0).sqrt());
            (
                Lattice::from_parameters(a, a, c, 90.0, 90.0, 120.0),
                vec![
                    (el(0), [1.0 / 3.0, 2.0 / 3.0, 0.25]),
                    (el(0), [2.0 / 3.0, 1.0 / 3.0, 0.75]),
                ],
            )
        }

        (Prototype::Diamond, false) => (
            fcc_primitive(a),
            vec![(el(0), [0.0, 0.0, 0.0]), (el(0), [0.25, 0.25, 0.25])],
        ),
        (Prototype::Diamond, true) => {
            let mut atoms: Vec<_> = FCC_BASIS.iter().map(|&f| (el(0), f)).collect();
            atoms.extend(FCC_BASIS.iter().map(|f| {
                (el(0), [f[0] + 0.25, f[1] + 0.25, f[2] + 0.25])
            }));
            (Lattice::cubic(a), atoms)
        }

        (Prototype::Rocksalt, false) => (
            fcc_primitive(a),
            vec![(el(0), [0.0, 0.0, 0.0]), (el(1), [0.5, 0.5, 0.5])],
        ),
        (Prototype::Rocksalt, true) => {
            let mut atoms: Vec<_> = FCC_BASIS.iter().map(|&f| (el(0), f)).collect();
            atoms.extend(FCC_BASIS.iter().map(|f| {
                (el(1), [(f[0] + 0.5) % 1.0, f[1], f[2]])
            }));
            (Lattice::cubic(a), atoms)
        }

        (Prototype::Perovskite, _) => (
            Lattice::cubic(a),
            vec![
                (el(0), [0.0, 0.0, 0.0]),
                (el(1), [0.5, 0.5, 0.5]),
                (el(2), [0.5, 0.5, 0.0]),
                (el(2), [0.5, 0.0, 0.5]),
                (el(2), [0.0, 0.5, 0.5]),
            ],
        ),
    };

    let (symbols, reduced): (Vec<String>, Vec<[f64; 3]>) = atoms.into_iter().unzip();
    let name = format!("{}-{}", params.elements.join(""), p);

    tracing::debug!("built {} prototype with {} atoms", p, symbols.len());
    Ok(Structure::from_reduced(symbols, lattice, reduced)?.with_name(name))
}

const FCC_BASIS: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
];

fn fcc_primitive(a: f64) -> Lattice {
    let h = a / 2.0;
    Lattice::from_vectors([[0.0, h, h], [h, 0.0, h], [h, h, 0.0]])
}

fn bcc_primitive(a: f64) -> Lattice {
    let h = a / 2.0;
    Lattice::from_vectors([[-h, h, h], [h, -h, h], [h, h, -h]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(p: Prototype, elements: &[&str], a: f64, conventional: bool) -> PrototypeParams {
        PrototypeParams {
            prototype: p,
            elements: elements.iter().map(|s| s.to_string()).collect(),
            a,
            c: None,
            conventional,
        }
    }

    #[test]
    fn test_parse_prototype() {
        assert_eq!("FCC".parse::<Prototype>().unwrap(), Prototype::Fcc);
        assert_eq!("NaCl".parse::<Prototype>().unwrap(), Prototype::Rocksalt);
        assert!("wurtzite".parse::<Prototype>().is_err());
    }

    #[test]
    fn test_primitive_and_conventional_volumes() {
        for p in [Prototype::Bcc, Prototype::Fcc, Prototype::Diamond, Prototype::Rocksalt] {
            let elements: Vec<&str> = ["Na", "Cl"][..p.num_elements()].to_vec();
            let prim = build(&params(p, &elements, 4.0, false)).unwrap();
            let conv = build(&params(p, &elements, 4.0, true)).unwrap();

            let ratio = conv.volume() / prim.volume();
            let atoms_ratio = conv.natom() as f64 / prim.natom() as f64;
            assert!((ratio - atoms_ratio).abs() < 1e-8, "{}", p);
            assert!((prim.density() - conv.density()).abs() < 1e-8, "{}", p);
        }
    }

    #[test]
    fn test_rocksalt_conventional_composition() {
        let s = build(&params(Prototype::Rocksalt, &["Na", "Cl"], 5.64, true)).unwrap();
        assert_eq!(s.formula(), "Cl4Na4");
        assert_eq!(s.name, "NaCl-rocksalt");
    }

    #[test]
    fn test_hcp_ideal_ratio() {
        let s = build(&params(Prototype::Hcp, &["Mg"], 3.21, false)).unwrap();
        let [a, _, c] = s.lattice().lengths();
        assert!((c / a - (8.0_f64 / 3.0).sqrt()).abs() < 1e-10);
        assert!((s.distance(0, 1).unwrap() - 3.21).abs() < 1e-8);
    }

    #[test]
    fn test_wrong_element_count() {
        assert!(build(&params(Prototype::Perovskite, &["Sr", "Ti"], 3.9, false)).is_err());
        assert!(build(&params(Prototype::Fcc, &["Au"], -1.0, false)).is_err());
    }
}
