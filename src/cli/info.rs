//! # info 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`

use clap::Args;
use std::path::PathBuf;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Structure file (POSCAR, .cell, .xyz, .json)
    pub file: PathBuf,

    /// Also print the interatomic distance matrix
    #[arg(long, default_value_t = false)]
    pub distances: bool,
}
