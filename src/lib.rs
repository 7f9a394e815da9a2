//! # chemia - 晶体结构、对称性与超胞
//!
//! 以库的形式提供结构模型、格式读写、空间群分析与 DFT+U 占据矩阵辅助，
//! 命令行程序 `chemia` 构建在其上。
//!
//! ```text
//! FCC 金原胞 --CrystalSymmetry--> 225 / Fm-3m --refine_cell--> 4 原子惯用晶胞
//!                                                   --supercell([2,2,2])--> 32 原子
//! ```
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── models/     (晶格、元素、结构、原型)
//!   ├── parsers/    (POSCAR, .cell, .xyz, .cif, .json)
//!   ├── symmetry/   (空间群，基于 moyo)
//!   ├── dftu/       (ABINIT DFT+U 占据矩阵)
//!   ├── batch/      (目录批量处理)
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod dftu;
pub mod error;
pub mod models;
pub mod parsers;
pub mod symmetry;
pub mod utils;

pub use error::{ChemiaError, Result};
pub use models::{Lattice, Structure};
pub use symmetry::CrystalSymmetry;
