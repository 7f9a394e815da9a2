//! # 空间群数据
//!
//! 230 个空间群的国际符号（简写 Hermann–Mauguin）与晶系划分。
//!
//! ## 依赖关系
//! - 被 `symmetry/analyzer.rs` 使用
//! - 纯静态数据，无外部依赖

use std::fmt;

/// 下标即空间群号，0 号占位
static SYMBOLS: &[&str] = &[
    "",
    // 三斜 1-2
    "P1", "P-1",
    // 单斜 3-15
    "P2", "P2_1", "C2", "Pm", "Pc", "Cm", "Cc", "P2/m", "P2_1/m", "C2/m", "P2/c", "P2_1/c",
    "C2/c",
    // 正交 16-74
    "P222", "P222_1", "P2_12_12", "P2_12_12_1", "C222_1", "C222", "F222", "I222", "I2_12_12_1",
    "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2", "Pmn2_1", "Pba2", "Pna2_1", "Pnn2",
    "Cmm2", "Cmc2_1", "Ccc2", "Amm2", "Aem2", "Ama2", "Aea2", "Fmm2", "Fdd2", "Imm2", "Iba2",
    "Ima2", "Pmmm", "Pnnn", "Pccm", "Pban", "Pmma", "Pnna", "Pmna", "Pcca", "Pbam", "Pccn",
    "Pbcm", "Pnnm", "Pmmn", "Pbcn", "Pbca", "Pnma", "Cmcm", "Cmce", "Cmmm", "Cccm", "Cmme",
    "Ccce", "Fmmm", "Fddd", "Immm", "Ibam", "Ibca", "Imma",
    // 四方 75-142
    "P4", "P4_1", "P4_2", "P4_3", "I4", "I4_1", "P-4", "I-4", "P4/m", "P4_2/m", "P4/n",
    "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12", "P4_122", "P4_12_12", "P4_222", "P4_22_12",
    "P4_322", "P4_32_12", "I422", "I4_122", "P4mm", "P4bm", "P4_2cm", "P4_2nm", "P4cc", "P4nc",
    "P4_2mc", "P4_2bc", "I4mm", "I4cm", "I4_1md", "I4_1cd", "P-42m", "P-42c", "P-42_1m",
    "P-42_1c", "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2", "I-42m", "I-42d", "P4/mmm",
    "P4/mcc", "P4/nbm", "P4/nnc", "P4/mbm", "P4/mnc", "P4/nmm", "P4/ncc", "P4_2/mmc", "P4_2/mcm",
    "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm", "P4_2/nmc", "P4_2/ncm", "I4/mmm", "I4/mcm",
    "I4_1/amd", "I4_1/acd",
    // 三方 143-167
    "P3", "P3_1", "P3_2", "R3", "P-3", "R-3", "P312", "P321", "P3_112", "P3_121", "P3_212",
    "P3_221", "R32", "P3m1", "P31m", "P3c1", "P31c", "R3m", "R3c", "P-31m", "P-31c", "P-3m1",
    "P-3c1", "R-3m", "R-3c",
    // 六方 168-194
    "P6", "P6_1", "P6_5", "P6_2", "P6_4", "P6_3", "P-6", "P6/m", "P6_3/m", "P622", "P6_122",
    "P6_522", "P6_222", "P6_422", "P6_322", "P6mm", "P6cc", "P6_3cm", "P6_3mc", "P-6m2",
    "P-6c2", "P-62m", "P-62c", "P6/mmm", "P6/mcc", "P6_3/mcm", "P6_3/mmc",
    // 立方 195-230
    "P23", "F23", "I23", "P2_13", "I2_13", "Pm-3", "Pn-3", "Fm-3", "Fd-3", "Im-3", "Pa-3",
    "Ia-3", "P432", "P4_232", "F432", "F4_132", "I432", "P4_332", "P4_132", "I4_132", "P-43m",
    "F-43m", "I-43m", "P-43n", "F-43c", "I-43d", "Pm-3m", "Pn-3n", "Pm-3n", "Pn-3m", "Fm-3m",
    "Fm-3c", "Fd-3m", "Fd-3c", "Im-3m", "Ia-3d",
];

/// 晶系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrystalSystem::Triclinic => "Triclinic",
            CrystalSystem::Monoclinic => "Monoclinic",
            CrystalSystem::Orthorhombic => "Orthorhombic",
            CrystalSystem::Tetragonal => "Tetragonal",
            CrystalSystem::Trigonal => "Trigonal",
            CrystalSystem::Hexagonal => "Hexagonal",
            CrystalSystem::Cubic => "Cubic",
        };
        write!(f, "{}", name)
    }
}

/// 空间群号 -> 国际符号
pub fn international_symbol(number: i32) -> Option<&'static str> {
    if (1..=230).contains(&number) {
        SYMBOLS.get(number as usize).copied()
    } else {
        None
    }
}

/// 空间群号 -> 晶系
pub fn crystal_system(number: i32) -> Option<CrystalSystem> {
    match number {
        1..=2 => Some(CrystalSystem::Triclinic),
        3..=15 => Some(CrystalSystem::Monoclinic),
        16..=74 => Some(CrystalSystem::Orthorhombic),
        75..=142 => Some(CrystalSystem::Tetragonal),
        143..=167 => Some(CrystalSystem::Trigonal),
        168..=194 => Some(CrystalSystem::Hexagonal),
        195..=230 => Some(CrystalSystem::Cubic),
        _ => None,
    }
}

/// 布拉维格子心型（符号首字母: P, A, C, F, I, R）
pub fn centering(number: i32) -> Option<char> {
    international_symbol(number).and_then(|s| s.chars().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_all_groups() {
        assert_eq!(SYMBOLS.len(), 231);
        assert!(SYMBOLS[1..].iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_landmark_symbols() {
        assert_eq!(international_symbol(1), Some("P1"));
        assert_eq!(international_symbol(14), Some("P2_1/c"));
        assert_eq!(international_symbol(62), Some("Pnma"));
        assert_eq!(international_symbol(139), Some("I4/mmm"));
        assert_eq!(international_symbol(166), Some("R-3m"));
        assert_eq!(international_symbol(194), Some("P6_3/mmc"));
        assert_eq!(international_symbol(221), Some("Pm-3m"));
        assert_eq!(international_symbol(225), Some("Fm-3m"));
        assert_eq!(international_symbol(227), Some("Fd-3m"));
        assert_eq!(international_symbol(229), Some("Im-3m"));
        assert_eq!(international_symbol(230), Some("Ia-3d"));
        assert_eq!(international_symbol(0), None);
        assert_eq!(international_symbol(231), None);
    }

    #[test]
    fn test_crystal_system_boundaries() {
        assert_eq!(crystal_system(2), Some(CrystalSystem::Triclinic));
        assert_eq!(crystal_system(15), Some(CrystalSystem::Monoclinic));
        assert_eq!(crystal_system(74), Some(CrystalSystem::Orthorhombic));
        assert_eq!(crystal_system(142), Some(CrystalSystem::Tetragonal));
        assert_eq!(crystal_system(167), Some(CrystalSystem::Trigonal));
        assert_eq!(crystal_system(194), Some(CrystalSystem::Hexagonal));
        assert_eq!(crystal_system(195), Some(CrystalSystem::Cubic));
        assert_eq!(crystal_system(231), None);
    }

    #[test]
    fn test_centering() {
        assert_eq!(centering(225), Some('F'));
        assert_eq!(centering(229), Some('I'));
        assert_eq!(centering(166), Some('R'));
        assert_eq!(centering(38), Some('A'));
    }
}
