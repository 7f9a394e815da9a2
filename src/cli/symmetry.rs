//! # symmetry 子命令 CLI 定义
//!
//! 单文件输入打印空间群详情；目录输入并行分析并输出汇总表。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/symmetry.rs`

use clap::Args;
use std::path::PathBuf;

/// symmetry 子命令参数
#[derive(Args, Debug)]
pub struct SymmetryArgs {
    /// Structure file or directory of structure files
    pub input: PathBuf,

    /// Distance tolerance (Å)
    #[arg(long, env = "CHEMIA_SYMPREC", default_value_t = crate::symmetry::analyzer::DEFAULT_SYMPREC)]
    pub symprec: f64,

    /// Angle tolerance (degrees); moyo's default when omitted
    #[arg(long)]
    pub angle_tolerance: Option<f64>,

    /// List the symmetry operations
    #[arg(long, default_value_t = false)]
    pub operations: bool,

    /// Write the refined conventional cell to this file
    #[arg(long)]
    pub refine: Option<PathBuf>,

    /// Write the standardized primitive cell to this file
    #[arg(long)]
    pub primitive: Option<PathBuf>,

    /// Glob patterns for directory input, comma separated
    #[arg(short, long, default_value = "POSCAR*,CONTCAR*,*.vasp,*.cell,*.xyz,*.json")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, env = "CHEMIA_JOBS", default_value_t = 0)]
    pub jobs: usize,

    /// Export the directory summary as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}
