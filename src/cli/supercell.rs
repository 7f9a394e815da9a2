//! # supercell 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/supercell.rs`

use super::FormatArg;
use clap::Args;
use std::path::PathBuf;

/// supercell 子命令参数
#[derive(Args, Debug)]
pub struct SupercellArgs {
    /// Structure file
    pub file: PathBuf,

    /// Repetitions along a, b and c
    #[arg(short, long, num_args = 3, value_names = ["NX", "NY", "NZ"], required = true)]
    pub size: Vec<usize>,

    /// Output file; the supercell is printed when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (inferred from the output name when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}
