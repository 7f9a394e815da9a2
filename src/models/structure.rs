//! # 晶体结构数据模型
//!
//! 统一的结构表示：元素符号、晶格、笛卡尔坐标与分数坐标（两者始终一致）、
//! 以及每个方向的周期性标志。分子体系同样用该结构表示，只是三个方向都不周期。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `symmetry/`, `commands/` 使用
//! - 使用 `models/lattice.rs`, `models/elements.rs`

use crate::error::{ChemiaError, Result};
use crate::models::elements;
use crate::models::lattice::{norm, Lattice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 原子质量单位 / Å³ -> g/cm³
const AMU_PER_A3_TO_G_PER_CM3: f64 = 1.660_539_066_60;

/// 分子体系外包盒在每个方向上附加的真空层 (Å)
const MOLECULE_VACUUM: f64 = 10.0;

/// 超胞原子数上限
pub const MAX_SUPERCELL_ATOMS: usize = 10_000_000;

/// 晶体结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StructureRecord", into = "StructureRecord")]
pub struct Structure {
    /// 结构名称
    pub name: String,
    symbols: Vec<String>,
    lattice: Lattice,
    /// 笛卡尔坐标 (Å)
    positions: Vec<[f64; 3]>,
    /// 分数坐标
    reduced: Vec<[f64; 3]>,
    periodicity: [bool; 3],
}

/// 序列化使用的原始记录，反序列化时经过完整校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureRecord {
    pub name: String,
    pub symbols: Vec<String>,
    pub lattice: Lattice,
    pub positions: Vec<[f64; 3]>,
    pub periodicity: [bool; 3],
}

impl TryFrom<StructureRecord> for Structure {
    type Error = ChemiaError;

    fn try_from(record: StructureRecord) -> Result<Self> {
        Ok(Structure::from_cartesian(record.symbols, record.lattice, record.positions)?
            .with_name(record.name)
            .with_periodicity(record.periodicity))
    }
}

impl From<Structure> for StructureRecord {
    fn from(s: Structure) -> Self {
        StructureRecord {
            name: s.name,
            symbols: s.symbols,
            lattice: s.lattice,
            positions: s.positions,
            periodicity: s.periodicity,
        }
    }
}

impl Structure {
    // ─────────────────────────────────────────────────────────────
    // 构造
    // ─────────────────────────────────────────────────────────────

    /// 由分数坐标构造周期结构
    pub fn from_reduced<S: Into<String>>(
        symbols: Vec<S>,
        lattice: Lattice,
        reduced: Vec<[f64; 3]>,
    ) -> Result<Self> {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        check_counts(&symbols, &reduced)?;
        lattice.inverse()?;

        let positions = reduced.iter().map(|&f| lattice.to_cartesian(f)).collect();
        let structure = Structure {
            name: String::new(),
            symbols,
            lattice,
            positions,
            reduced,
            periodicity: [true; 3],
        };
        structure.validate()?;
        Ok(structure)
    }

    /// 由笛卡尔坐标构造周期结构
    pub fn from_cartesian<S: Into<String>>(
        symbols: Vec<S>,
        lattice: Lattice,
        positions: Vec<[f64; 3]>,
    ) -> Result<Self> {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        check_counts(&symbols, &positions)?;

        let reduced = positions
            .iter()
            .map(|&r| lattice.to_fractional(r))
            .collect::<Result<Vec<_>>>()?;
        let structure = Structure {
            name: String::new(),
            symbols,
            lattice,
            positions,
            reduced,
            periodicity: [true; 3],
        };
        structure.validate()?;
        Ok(structure)
    }

    /// 构造分子（无周期性），盒子为外包盒加真空层
    pub fn molecule<S: Into<String>>(symbols: Vec<S>, positions: Vec<[f64; 3]>) -> Result<Self> {
        let mut extent = [0.0_f64; 3];
        for axis in 0..3 {
            let (lo, hi) = positions.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            extent[axis] = if positions.is_empty() { 0.0 } else { hi - lo };
        }

        let lattice = Lattice::from_vectors([
            [extent[0] + MOLECULE_VACUUM, 0.0, 0.0],
            [0.0, extent[1] + MOLECULE_VACUUM, 0.0],
            [0.0, 0.0, extent[2] + MOLECULE_VACUUM],
        ]);

        Ok(Structure::from_cartesian(symbols, lattice, positions)?.with_periodicity([false; 3]))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_periodicity(mut self, periodicity: [bool; 3]) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// 校验结构的内部一致性
    pub fn validate(&self) -> Result<()> {
        check_counts(&self.symbols, &self.positions)?;
        if self.reduced.len() != self.positions.len() {
            return Err(ChemiaError::InvalidStructure(
                "reduced and Cartesian coordinates differ in length".to_string(),
            ));
        }

        for symbol in &self.symbols {
            if !elements::is_valid_symbol(symbol) {
                return Err(ChemiaError::UnknownElement(symbol.clone()));
            }
        }

        self.lattice.inverse()?;
        if self.lattice.matrix.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ChemiaError::InvalidStructure(
                "lattice contains non-finite values".to_string(),
            ));
        }

        for (i, p) in self.positions.iter().enumerate() {
            if p.iter().any(|v| !v.is_finite()) {
                return Err(ChemiaError::InvalidStructure(format!(
                    "position of atom {} is not finite",
                    i + 1
                )));
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // 查询
    // ─────────────────────────────────────────────────────────────

    pub fn natom(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// 笛卡尔坐标 (Å)
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// 分数坐标
    pub fn reduced_positions(&self) -> &[[f64; 3]] {
        &self.reduced
    }

    pub fn periodicity(&self) -> [bool; 3] {
        self.periodicity
    }

    /// 三个方向均周期
    pub fn is_periodic(&self) -> bool {
        self.periodicity.iter().all(|&p| p)
    }

    pub fn is_crystal(&self) -> bool {
        self.is_periodic()
    }

    /// 元素种类，按首次出现顺序
    pub fn species(&self) -> Vec<String> {
        let mut species: Vec<String> = Vec::new();
        for s in &self.symbols {
            if !species.contains(s) {
                species.push(s.clone());
            }
        }
        species
    }

    /// 元素 -> 原子数
    pub fn composition(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for s in &self.symbols {
            *counts.entry(s.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        format_formula(&self.composition(), 1)
    }

    /// 约化化学式，如 Au4 -> Au, Na4Cl4 -> ClNa
    pub fn reduced_formula(&self) -> String {
        let composition = self.composition();
        let divisor = composition.values().copied().fold(0, gcd).max(1);
        format_formula(&composition, divisor)
    }

    /// 晶胞体积 (Å³)
    pub fn volume(&self) -> f64 {
        self.lattice.volume().abs()
    }

    /// 质量密度 (g/cm³)
    pub fn density(&self) -> f64 {
        let mass: f64 = self
            .symbols
            .iter()
            .filter_map(|s| elements::atomic_mass(s))
            .sum();
        mass * AMU_PER_A3_TO_G_PER_CM3 / self.volume()
    }

    /// 两原子间距离（周期方向取最小镜像）
    pub fn distance(&self, i: usize, j: usize) -> Result<f64> {
        self.check_index(i)?;
        self.check_index(j)?;

        let mut diff = [0.0; 3];
        for axis in 0..3 {
            diff[axis] = self.reduced[j][axis] - self.reduced[i][axis];
            if self.periodicity[axis] {
                diff[axis] -= diff[axis].round();
            }
        }

        // 斜晶胞中取整后的向量未必最短，再检查相邻镜像
        let shifts = |axis: usize| -> &'static [f64] {
            if self.periodicity[axis] {
                &[-1.0, 0.0, 1.0]
            } else {
                &[0.0]
            }
        };

        let mut best = f64::MAX;
        for &sx in shifts(0) {
            for &sy in shifts(1) {
                for &sz in shifts(2) {
                    let cart = self
                        .lattice
                        .to_cartesian([diff[0] + sx, diff[1] + sy, diff[2] + sz]);
                    best = best.min(norm(&cart));
                }
            }
        }

        Ok(best)
    }

    /// 全部原子对距离矩阵
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.natom();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                // 下标均合法
                let d = self.distance(i, j).unwrap_or(f64::NAN);
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }
        matrix
    }

    // ─────────────────────────────────────────────────────────────
    // 修改
    // ─────────────────────────────────────────────────────────────

    /// 添加原子（笛卡尔坐标）
    pub fn add_atom(&mut self, symbol: impl Into<String>, position: [f64; 3]) -> Result<()> {
        let symbol = symbol.into();
        if !elements::is_valid_symbol(&symbol) {
            return Err(ChemiaError::UnknownElement(symbol));
        }
        let reduced = self.lattice.to_fractional(position)?;

        self.symbols.push(symbol);
        self.positions.push(position);
        self.reduced.push(reduced);
        Ok(())
    }

    /// 删除第 index 个原子（从 0 开始）
    pub fn del_atom(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.symbols.remove(index);
        self.positions.remove(index);
        self.reduced.remove(index);
        Ok(())
    }

    /// 按元素种类（首次出现顺序）稳定排序
    pub fn sort_by_species(&mut self) {
        let species = self.species();
        let mut order: Vec<usize> = (0..self.natom()).collect();
        order.sort_by_key(|&i| species.iter().position(|s| *s == self.symbols[i]));

        self.symbols = order.iter().map(|&i| self.symbols[i].clone()).collect();
        self.positions = order.iter().map(|&i| self.positions[i]).collect();
        self.reduced = order.iter().map(|&i| self.reduced[i]).collect();
    }

    /// 将周期方向上的分数坐标折回 [0, 1)
    pub fn wrap_to_cell(&mut self) {
        for (frac, cart) in self.reduced.iter_mut().zip(self.positions.iter_mut()) {
            for axis in 0..3 {
                if self.periodicity[axis] {
                    frac[axis] = wrap_unit(frac[axis]);
                }
            }
            *cart = self.lattice.to_cartesian(*frac);
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 超胞
    // ─────────────────────────────────────────────────────────────

    /// 沿三个晶格方向分别重复 nx, ny, nz 次
    ///
    /// 平移 (i, j, k) 在外层循环（k 变化最快），原胞内原子在内层。
    pub fn supercell(&self, size: [usize; 3]) -> Result<Structure> {
        if size.iter().any(|&n| n == 0) {
            return Err(ChemiaError::InvalidSupercell {
                size,
                reason: "multipliers must be at least 1".to_string(),
            });
        }
        for axis in 0..3 {
            if size[axis] > 1 && !self.periodicity[axis] {
                return Err(ChemiaError::InvalidSupercell {
                    size,
                    reason: format!("axis {} is not periodic", axis_label(axis)),
                });
            }
        }

        let lattice = self.lattice.scaled(size);
        let total = size[0]
            .checked_mul(size[1])
            .and_then(|n| n.checked_mul(size[2]))
            .and_then(|n| n.checked_mul(self.natom()))
            .filter(|&n| n <= MAX_SUPERCELL_ATOMS)
            .ok_or_else(|| ChemiaError::InvalidSupercell {
                size,
                reason: format!("more than {} atoms", MAX_SUPERCELL_ATOMS),
            })?;
        let mut symbols = Vec::with_capacity(total);
        let mut reduced = Vec::with_capacity(total);

        for i in 0..size[0] {
            for j in 0..size[1] {
                for k in 0..size[2] {
                    let shift = [i as f64, j as f64, k as f64];
                    for (symbol, frac) in self.symbols.iter().zip(self.reduced.iter()) {
                        symbols.push(symbol.clone());
                        reduced.push([
                            (frac[0] + shift[0]) / size[0] as f64,
                            (frac[1] + shift[1]) / size[1] as f64,
                            (frac[2] + shift[2]) / size[2] as f64,
                        ]);
                    }
                }
            }
        }

        let name = if self.name.is_empty() {
            String::new()
        } else {
            format!("{}_{}x{}x{}", self.name, size[0], size[1], size[2])
        };

        tracing::debug!(
            "supercell {}x{}x{}: {} -> {} atoms",
            size[0],
            size[1],
            size[2],
            self.natom(),
            symbols.len()
        );

        Ok(Structure::from_reduced(symbols, lattice, reduced)?
            .with_name(name)
            .with_periodicity(self.periodicity))
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.natom() {
            return Err(ChemiaError::AtomIndexOutOfRange {
                index,
                natom: self.natom(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.natom())?;
        writeln!(f)?;
        writeln!(
            f,
            " Symb  (             Positions            ) [     Cell-reduced coordinates     ]"
        )?;
        for ((symbol, p), r) in self
            .symbols
            .iter()
            .zip(self.positions.iter())
            .zip(self.reduced.iter())
        {
            writeln!(
                f,
                " {:>4}  ( {:10.4} {:10.4} {:10.4} ) [ {:10.4} {:10.4} {:10.4} ]",
                symbol, p[0], p[1], p[2], r[0], r[1], r[2]
            )?;
        }

        writeln!(f)?;
        write!(f, "Periodicity:")?;
        if self.periodicity.iter().any(|&p| p) {
            for axis in (0..3).filter(|&a| self.periodicity[a]) {
                write!(f, "  {}", axis_label(axis))?;
            }
        } else {
            write!(f, "  None")?;
        }
        writeln!(f)?;

        writeln!(f)?;
        writeln!(f, "Lattice vectors:")?;
        for row in &self.lattice.matrix {
            writeln!(f, "{:10.4} {:10.4} {:10.4}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

fn check_counts(symbols: &[String], positions: &[[f64; 3]]) -> Result<()> {
    if symbols.len() != positions.len() {
        return Err(ChemiaError::InvalidStructure(format!(
            "{} symbols but {} positions",
            symbols.len(),
            positions.len()
        )));
    }
    Ok(())
}

fn format_formula(composition: &BTreeMap<String, usize>, divisor: usize) -> String {
    composition
        .iter()
        .map(|(el, &count)| {
            let n = count / divisor;
            if n == 1 {
                el.clone()
            } else {
                format!("{}{}", el, n)
            }
        })
        .collect::<Vec<_>>()
        .join("")
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// 折回 [0, 1)，并吸收 1 - ε 的舍入误差
fn wrap_unit(x: f64) -> f64 {
    let w = x - x.floor();
    if (1.0 - w).abs() < 1e-10 {
        0.0
    } else {
        w
    }
}

fn axis_label(axis: usize) -> char {
    ['X', 'Y', 'Z'][axis]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fcc_gold() -> Structure {
        let a = 4.078;
        let lattice = Lattice::from_vectors([
            [0.0, a / 2.0, a / 2.0],
            [a / 2.0, 0.0, a / 2.0],
            [a / 2.0, a / 2.0, 0.0],
        ]);
        Structure::from_reduced(vec!["Au"], lattice, vec![[0.0, 0.0, 0.0]])
            .unwrap()
            .with_name("Au")
    }

    fn rocksalt() -> Structure {
        let atoms = vec![
            ("Na", [0.0, 0.0, 0.0]),
            ("Na", [0.5, 0.5, 0.0]),
            ("Na", [0.5, 0.0, 0.5]),
            ("Na", [0.0, 0.5, 0.5]),
            ("Cl", [0.5, 0.0, 0.0]),
            ("Cl", [0.0, 0.5, 0.0]),
            ("Cl", [0.0, 0.0, 0.5]),
            ("Cl", [0.5, 0.5, 0.5]),
        ];
        let (symbols, reduced): (Vec<_>, Vec<_>) = atoms.into_iter().unzip();
        Structure::from_reduced(symbols, Lattice::cubic(5.64), reduced).unwrap()
    }

    #[test]
    fn test_crystal_formula() {
        let s = rocksalt();
        assert_eq!(s.formula(), "Cl4Na4");
        assert_eq!(s.reduced_formula(), "ClNa");
        assert_eq!(s.species(), vec!["Na".to_string(), "Cl".to_string()]);
    }

    #[test]
    fn test_cartesian_and_reduced_agree() {
        let s = fcc_gold();
        let cart = Structure::from_cartesian(
            vec!["Au", "Au"],
            *s.lattice(),
            vec![[0.0, 0.0, 0.0], [2.039, 2.039, 0.0]],
        )
        .unwrap();

        // (2.039, 2.039, 0) = c 向量 -> 分数坐标 (0, 0, 1)
        let r = cart.reduced_positions()[1];
        assert!(r[0].abs() < 1e-10);
        assert!(r[1].abs() < 1e-10);
        assert!((r[2] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = Structure::from_reduced(vec!["Au", "Au"], Lattice::cubic(4.0), vec![[0.0; 3]]);
        assert!(matches!(err, Err(ChemiaError::InvalidStructure(_))));
    }

    #[test]
    fn test_unknown_element_rejected() {
        let err = Structure::from_reduced(vec!["Qq"], Lattice::cubic(4.0), vec![[0.0; 3]]);
        assert!(matches!(err, Err(ChemiaError::UnknownElement(_))));
    }

    #[test]
    fn test_gold_density() {
        let a = 4.078;
        let conventional = Structure::from_reduced(
            vec!["Au"; 4],
            Lattice::cubic(a),
            vec![
                [0.0, 0.0, 0.0],
                [0.0, 0.5, 0.5],
                [0.5, 0.0, 0.5],
                [0.5, 0.5, 0.0],
            ],
        )
        .unwrap();

        // 实验密度约 19.3 g/cm³
        assert!((conventional.density() - 19.3).abs() < 0.1);
        assert!((fcc_gold().density() - conventional.density()).abs() < 1e-8);
    }

    #[test]
    fn test_supercell_counts_and_volume() {
        let s = rocksalt();
        let sc = s.supercell([2, 2, 2]).unwrap();

        assert_eq!(sc.natom(), 64);
        assert!((sc.volume() - 8.0 * s.volume()).abs() < 1e-8);
        assert_eq!(sc.reduced_formula(), "ClNa");
    }

    #[test]
    fn test_supercell_coordinates_are_consistent() {
        let s = fcc_gold();
        let sc = s.supercell([2, 2, 2]).unwrap();

        assert_eq!(sc.natom(), 8);
        // 第二个副本平移 (0, 0, 1)，k 变化最快
        let r = sc.reduced_positions()[1];
        assert_eq!(r, [0.0, 0.0, 0.5]);
        // 笛卡尔坐标 = 原胞 c 向量
        let p = sc.positions()[1];
        let c = s.lattice().matrix[2];
        for axis in 0..3 {
            assert!((p[axis] - c[axis]).abs() < 1e-10);
        }
        // 最后一个副本平移 (1, 1, 1)
        let last = sc.positions()[7];
        let expected = s.lattice().to_cartesian([1.0, 1.0, 1.0]);
        for axis in 0..3 {
            assert!((last[axis] - expected[axis]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_supercell_rejects_zero_and_nonperiodic() {
        let s = fcc_gold();
        assert!(s.supercell([0, 1, 1]).is_err());

        let slab = s.clone().with_periodicity([true, true, false]);
        assert!(slab.supercell([2, 2, 2]).is_err());
        assert_eq!(slab.supercell([2, 2, 1]).unwrap().natom(), 4);
    }

    #[test]
    fn test_supercell_rejects_oversized_multipliers() {
        let s = fcc_gold();
        let err = s.supercell([100_000, 100_000, 100_000]).unwrap_err();
        assert!(matches!(err, ChemiaError::InvalidSupercell { .. }));
        assert!(s.supercell([usize::MAX, 2, 1]).is_err());
        assert!(s.supercell([usize::MAX, usize::MAX, usize::MAX]).is_err());
    }

    #[test]
    fn test_minimum_image_distance() {
        let s = Structure::from_reduced(
            vec!["Fe", "Fe"],
            Lattice::cubic(10.0),
            vec![[0.05, 0.0, 0.0], [0.95, 0.0, 0.0]],
        )
        .unwrap();

        assert!((s.distance(0, 1).unwrap() - 1.0).abs() < 1e-10);

        let cluster = s.clone().with_periodicity([false; 3]);
        assert!((cluster.distance(0, 1).unwrap() - 9.0).abs() < 1e-10);
        assert!(s.distance(0, 5).is_err());
    }

    #[test]
    fn test_nearest_neighbour_in_fcc() {
        let sc = fcc_gold().supercell([2, 2, 2]).unwrap();
        let d = sc.distance_matrix();
        let nn = d[0][1..].iter().cloned().fold(f64::MAX, f64::min);
        assert!((nn - 4.078 / 2f64.sqrt()).abs() < 1e-8);
    }

    #[test]
    fn test_add_del_sort() {
        let mut s = rocksalt();
        s.add_atom("Na", [1.0, 1.0, 1.0]).unwrap();
        assert_eq!(s.natom(), 9);
        assert!(s.add_atom("Zz", [0.0; 3]).is_err());

        s.sort_by_species();
        assert_eq!(s.symbols()[4], "Na");
        assert_eq!(s.symbols()[5], "Cl");

        s.del_atom(4).unwrap();
        assert_eq!(s.composition()["Na"], 4);
        assert!(s.del_atom(100).is_err());
    }

    #[test]
    fn test_wrap_to_cell() {
        let mut s = Structure::from_reduced(
            vec!["Si", "Si"],
            Lattice::cubic(5.43),
            vec![[1.25, -0.25, 0.5], [-1.0, 0.999_999_999_999_9, 2.0]],
        )
        .unwrap();
        s.wrap_to_cell();

        let r = s.reduced_positions();
        assert!((r[0][0] - 0.25).abs() < 1e-10);
        assert!((r[0][1] - 0.75).abs() < 1e-10);
        assert_eq!(r[1], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_molecule_box() {
        let m = Structure::molecule(
            vec!["O", "H", "H"],
            vec![[0.0, 0.0, 0.0], [0.757, 0.586, 0.0], [-0.757, 0.586, 0.0]],
        )
        .unwrap();

        assert!(!m.is_periodic());
        let [a, b, c] = m.lattice().lengths();
        assert!((a - (1.514 + MOLECULE_VACUUM)).abs() < 1e-10);
        assert!((b - (0.586 + MOLECULE_VACUUM)).abs() < 1e-10);
        assert!((c - MOLECULE_VACUUM).abs() < 1e-10);
        assert!(m.to_string().contains("Periodicity:  None"));
    }

    #[test]
    fn test_display_layout() {
        let text = fcc_gold().to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "1");
        assert_eq!(
            lines[3],
            "   Au  (     0.0000     0.0000     0.0000 ) [     0.0000     0.0000     0.0000 ]"
        );
        assert_eq!(lines[5], "Periodicity:  X  Y  Z");
        assert_eq!(lines[8], "    0.0000     2.0390     2.0390");
    }

    #[test]
    fn test_json_round_trip_validates() {
        let s = rocksalt().with_name("NaCl");
        let json = serde_json::to_string(&s).unwrap();
        let back: Structure = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "NaCl");
        assert_eq!(back.natom(), 8);

        let bad = json.replace("\"Na\"", "\"Xq\"");
        assert!(serde_json::from_str::<Structure>(&bad).is_err());
    }
}
