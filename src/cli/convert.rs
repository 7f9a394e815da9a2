//! # convert 子命令 CLI 定义
//!
//! 批量转换结构文件格式 (POSCAR, .cell, .xyz, .json -> 任一支持格式)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use super::FormatArg;
use clap::Args;
use std::path::PathBuf;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input file or directory containing structure files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for converted files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target output format
    #[arg(short, long, value_enum)]
    pub target: FormatArg,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Glob patterns for input files, comma separated
    #[arg(short, long, default_value = "POSCAR*,CONTCAR*,*.vasp,*.cell,*.xyz,*.json")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, env = "CHEMIA_JOBS", default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
