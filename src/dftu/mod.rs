//! # DFT+U 占据矩阵搜索辅助
//!
//! 为 ABINIT 的 `dmatpawu` 生成、分解、比较候选占据矩阵，
//! 并从输出文件中读取最终占据矩阵。
//!
//! ## 依赖关系
//! - 被 `commands/dftu.rs` 使用
//! - 子模块: abinit, population, output

pub mod abinit;
pub mod output;
pub mod population;

pub use abinit::AbinitInput;
pub use output::CorrelatedAtom;
pub use population::{OccupationParams, OrbitalDftu, SpinConfig};
