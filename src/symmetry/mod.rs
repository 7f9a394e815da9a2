//! # 对称性模块
//!
//! 空间群识别、惯用晶胞精化与原胞查找。
//!
//! ## 依赖关系
//! - 被 `commands/symmetry.rs` 使用
//! - 使用 `models/`
//! - 子模块: analyzer, spacegroup

pub mod analyzer;
pub mod spacegroup;

pub use analyzer::{CrystalSymmetry, SymmetryOperation, SymmetryOptions, SymmetrySummary};
pub use spacegroup::CrystalSystem;
