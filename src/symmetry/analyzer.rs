//! # 空间群分析
//!
//! 调用 `moyo` 搜索结构的空间群，并生成标准化的惯用晶胞与原胞。
//!
//! ## 坐标约定
//! - chemia 的晶格矩阵按行存放 a, b, c
//! - `moyo::base::Lattice::new` 接受行基矢，内部 `basis` 按列存放
//!
//! ## 依赖关系
//! - 被 `commands/symmetry.rs` 使用
//! - 使用 `models/`, `symmetry/spacegroup.rs`
//! - 使用 `moyo`, `nalgebra`

use crate::error::{ChemiaError, Result};
use crate::models::{elements, Lattice, Structure};
use crate::symmetry::spacegroup::{self, CrystalSystem};

use moyo::base::{AngleTolerance, Cell, Lattice as MoyoLattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// 默认距离容差 (Å)
pub const DEFAULT_SYMPREC: f64 = 1e-4;

/// 对称性搜索容差
#[derive(Debug, Clone, Copy)]
pub struct SymmetryOptions {
    /// 距离容差 (Å)
    pub symprec: f64,
    /// 角度容差（度），None 使用 moyo 默认值
    pub angle_tolerance: Option<f64>,
}

impl Default for SymmetryOptions {
    fn default() -> Self {
        Self {
            symprec: DEFAULT_SYMPREC,
            angle_tolerance: None,
        }
    }
}

/// 对称操作：分数坐标下 x' = R x + t
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymmetryOperation {
    pub rotation: [[i32; 3]; 3],
    pub translation: [f64; 3],
}

impl SymmetryOperation {
    /// 作用于分数坐标
    pub fn apply(&self, frac: [f64; 3]) -> [f64; 3] {
        let r = self.rotation;
        let mut out = self.translation;
        for (i, value) in out.iter_mut().enumerate() {
            *value += r[i][0] as f64 * frac[0] + r[i][1] as f64 * frac[1] + r[i][2] as f64 * frac[2];
        }
        out
    }
}

/// 单个结构的对称性摘要（用于表格/CSV 输出）
#[derive(Debug, Clone, Serialize)]
pub struct SymmetrySummary {
    pub name: String,
    pub formula: String,
    pub number: i32,
    pub symbol: String,
    pub crystal_system: String,
    pub hall_number: i32,
    pub pearson_symbol: String,
    pub num_operations: usize,
}

/// 晶体对称性
pub struct CrystalSymmetry {
    structure: Structure,
    dataset: MoyoDataset,
    options: SymmetryOptions,
}

impl CrystalSymmetry {
    /// 使用默认容差分析
    pub fn new(structure: &Structure) -> Result<Self> {
        Self::with_options(structure, SymmetryOptions::default())
    }

    pub fn with_options(structure: &Structure, options: SymmetryOptions) -> Result<Self> {
        if !structure.is_periodic() {
            return Err(ChemiaError::SymmetryError(
                "space groups require periodicity along X, Y and Z".to_string(),
            ));
        }
        if structure.natom() == 0 {
            return Err(ChemiaError::SymmetryError("structure has no atoms".to_string()));
        }
        if options.symprec <= 0.0 {
            return Err(ChemiaError::InvalidArgument(format!(
                "symprec must be positive, got {}",
                options.symprec
            )));
        }

        let cell = to_moyo_cell(structure)?;
        let angle_tolerance = match options.angle_tolerance {
            Some(deg) => AngleTolerance::Radian(deg.to_radians()),
            None => AngleTolerance::Default,
        };

        let dataset = MoyoDataset::new(
            &cell,
            options.symprec,
            angle_tolerance,
            Setting::Spglib,
            true,
        )
        .map_err(|e| ChemiaError::SymmetryError(format!("{:?}", e)))?;

        tracing::debug!(
            "space group of '{}': {} ({}), {} operations",
            structure.name,
            dataset.number,
            spacegroup::international_symbol(dataset.number).unwrap_or("?"),
            dataset.operations.len()
        );

        Ok(Self {
            structure: structure.clone(),
            dataset,
            options,
        })
    }

    pub fn options(&self) -> SymmetryOptions {
        self.options
    }

    /// 空间群号 (1-230)
    pub fn number(&self) -> i32 {
        self.dataset.number
    }

    /// 国际符号，如 "Fm-3m"
    pub fn symbol(&self) -> &'static str {
        spacegroup::international_symbol(self.dataset.number).unwrap_or("?")
    }

    pub fn crystal_system(&self) -> Option<CrystalSystem> {
        spacegroup::crystal_system(self.dataset.number)
    }

    pub fn lattice_centering(&self) -> Option<char> {
        spacegroup::centering(self.dataset.number)
    }

    pub fn hall_number(&self) -> i32 {
        self.dataset.hall_number
    }

    pub fn pearson_symbol(&self) -> &str {
        &self.dataset.pearson_symbol
    }

    pub fn num_operations(&self) -> usize {
        self.dataset.operations.len()
    }

    /// 输入晶胞下的对称操作
    pub fn operations(&self) -> Vec<SymmetryOperation> {
        self.dataset
            .operations
            .iter()
            .map(|op| {
                let mut rotation = [[0; 3]; 3];
                for (i, row) in rotation.iter_mut().enumerate() {
                    for (j, value) in row.iter_mut().enumerate() {
                        *value = op.rotation[(i, j)];
                    }
                }
                SymmetryOperation {
                    rotation,
                    translation: [op.translation.x, op.translation.y, op.translation.z],
                }
            })
            .collect()
    }

    /// 每个输入原子的 Wyckoff 字母
    pub fn wyckoff_letters(&self) -> Vec<char> {
        self.dataset.wyckoffs.clone()
    }

    /// 标准化惯用晶胞
    pub fn refine_cell(&self) -> Result<Structure> {
        let name = format!("{}_conventional", self.structure.name);
        from_moyo_cell(&self.dataset.std_cell, name.trim_start_matches('_'))
    }

    /// 标准化原胞
    pub fn find_primitive(&self) -> Result<Structure> {
        let name = format!("{}_primitive", self.structure.name);
        from_moyo_cell(&self.dataset.prim_std_cell, name.trim_start_matches('_'))
    }

    pub fn summary(&self) -> SymmetrySummary {
        SymmetrySummary {
            name: self.structure.name.clone(),
            formula: self.structure.formula(),
            number: self.number(),
            symbol: self.symbol().to_string(),
            crystal_system: self
                .crystal_system()
                .map(|s| s.to_string())
                .unwrap_or_default(),
            hall_number: self.hall_number(),
            pearson_symbol: self.pearson_symbol().to_string(),
            num_operations: self.num_operations(),
        }
    }
}

/// Structure -> moyo Cell，物种编号取原子序数
fn to_moyo_cell(structure: &Structure) -> Result<Cell> {
    let m = structure.lattice().matrix;
    let lattice = MoyoLattice::new(Matrix3::new(
        m[0][0], m[0][1], m[0][2], //
        m[1][0], m[1][1], m[1][2], //
        m[2][0], m[2][1], m[2][2],
    ));

    let positions = structure
        .reduced_positions()
        .iter()
        .map(|f| Vector3::new(f[0], f[1], f[2]))
        .collect();

    let numbers = structure
        .symbols()
        .iter()
        .map(|s| {
            elements::atomic_number(s)
                .map(|z| z as i32)
                .ok_or_else(|| ChemiaError::UnknownElement(s.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Cell::new(lattice, positions, numbers))
}

/// moyo Cell -> Structure
fn from_moyo_cell(cell: &Cell, name: &str) -> Result<Structure> {
    let basis = cell.lattice.basis;
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        // 第 i 个基矢是 basis 的第 i 列
        *row = [basis[(0, i)], basis[(1, i)], basis[(2, i)]];
    }

    let symbols = cell
        .numbers
        .iter()
        .map(|&z| {
            u32::try_from(z)
                .ok()
                .and_then(elements::symbol)
                .ok_or_else(|| ChemiaError::SymmetryError(format!("unexpected species number {}", z)))
        })
        .collect::<Result<Vec<_>>>()?;

    let reduced = cell.positions.iter().map(|p| [p.x, p.y, p.z]).collect();

    let mut structure = Structure::from_reduced(symbols, Lattice::from_vectors(matrix), reduced)?
        .with_name(name);
    structure.wrap_to_cell();
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prototypes::{build, Prototype, PrototypeParams};

    fn proto(p: Prototype, elements: &[&str], a: f64, conventional: bool) -> Structure {
        build(&PrototypeParams {
            prototype: p,
            elements: elements.iter().map(|s| s.to_string()).collect(),
            a,
            c: None,
            conventional,
        })
        .unwrap()
    }

    #[test]
    fn test_fcc_gold_is_fm3m() {
        let gold = proto(Prototype::Fcc, &["Au"], 4.078, false);
        let symm = CrystalSymmetry::new(&gold).unwrap();

        assert_eq!(symm.number(), 225);
        assert_eq!(symm.symbol(), "Fm-3m");
        assert_eq!(symm.crystal_system(), Some(CrystalSystem::Cubic));
        assert_eq!(symm.lattice_centering(), Some('F'));
        assert_eq!(symm.num_operations(), 48);
        assert_eq!(symm.wyckoff_letters(), vec!['a']);
    }

    #[test]
    fn test_refine_fcc_gives_conventional_cube() {
        let gold = proto(Prototype::Fcc, &["Au"], 4.078, false);
        let conventional = CrystalSymmetry::new(&gold).unwrap().refine_cell().unwrap();

        assert_eq!(conventional.natom(), 4);
        assert!(conventional.symbols().iter().all(|s| s == "Au"));
        assert!((conventional.volume() - 4.0 * gold.volume()).abs() < 1e-6);

        let (a, b, c, alpha, beta, gamma) = conventional.lattice().parameters();
        for length in [a, b, c] {
            assert!((length - 4.078).abs() < 1e-6);
        }
        for angle in [alpha, beta, gamma] {
            assert!((angle - 90.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_primitive_of_conventional_rocksalt() {
        let nacl = proto(Prototype::Rocksalt, &["Na", "Cl"], 5.64, true);
        let symm = CrystalSymmetry::new(&nacl).unwrap();

        assert_eq!(symm.number(), 225);
        // 惯用晶胞中含 4 个格点平移
        assert_eq!(symm.num_operations(), 192);

        let prim = symm.find_primitive().unwrap();
        assert_eq!(prim.natom(), 2);
        assert_eq!(prim.reduced_formula(), "ClNa");
        assert!((prim.volume() * 4.0 - nacl.volume()).abs() < 1e-6);
    }

    #[test]
    fn test_other_prototypes() {
        let cases = [
            (proto(Prototype::Bcc, &["Fe"], 2.87, false), 229, "Im-3m"),
            (proto(Prototype::Diamond, &["Si"], 5.43, false), 227, "Fd-3m"),
            (proto(Prototype::Hcp, &["Mg"], 3.21, false), 194, "P6_3/mmc"),
            (proto(Prototype::SimpleCubic, &["Po"], 3.35, false), 221, "Pm-3m"),
            (
                proto(Prototype::Perovskite, &["Sr", "Ti", "O"], 3.905, false),
                221,
                "Pm-3m",
            ),
        ];

        for (structure, number, symbol) in cases {
            let symm = CrystalSymmetry::new(&structure).unwrap();
            assert_eq!(symm.number(), number, "{}", structure.name);
            assert_eq!(symm.symbol(), symbol);
        }
    }

    #[test]
    fn test_tetragonal_distortion_lowers_symmetry() {
        let s = Structure::from_reduced(
            vec!["In"; 2],
            Lattice::from_parameters(3.25, 3.25, 4.95, 90.0, 90.0, 90.0),
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        )
        .unwrap();

        let symm = CrystalSymmetry::new(&s).unwrap();
        assert_eq!(symm.number(), 139);
        assert_eq!(symm.symbol(), "I4/mmm");
        assert_eq!(symm.crystal_system(), Some(CrystalSystem::Tetragonal));
    }

    #[test]
    fn test_operations_map_structure_onto_itself() {
        let si = proto(Prototype::Diamond, &["Si"], 5.43, false);
        let symm = CrystalSymmetry::new(&si).unwrap();

        for op in symm.operations() {
            for frac in si.reduced_positions() {
                let image = op.apply(*frac);
                let matched = si.reduced_positions().iter().any(|other| {
                    (0..3).all(|k| {
                        let d = image[k] - other[k];
                        (d - d.round()).abs() < 1e-6
                    })
                });
                assert!(matched);
            }
        }
    }

    #[test]
    fn test_molecule_is_rejected() {
        let m = Structure::molecule(vec!["H", "H"], vec![[0.0; 3], [0.74, 0.0, 0.0]]).unwrap();
        assert!(matches!(
            CrystalSymmetry::new(&m),
            Err(ChemiaError::SymmetryError(_))
        ));
    }

    #[test]
    fn test_summary_fields() {
        let gold = proto(Prototype::Fcc, &["Au"], 4.078, false);
        let summary = CrystalSymmetry::new(&gold).unwrap().summary();

        assert_eq!(summary.name, "Au-fcc");
        assert_eq!(summary.symbol, "Fm-3m");
        assert_eq!(summary.crystal_system, "Cubic");
        assert_eq!(summary.pearson_symbol, "cF4");
    }
}
