//! # dftu 子命令 CLI 定义
//!
//! DFT+U 占据矩阵辅助，包含多个子命令：
//! - `info`: 显示由 ABINIT 输入推断出的设置
//! - `random`: 生成随机候选及其 dmatpawu
//! - `extract`: 从 ABINIT 输出读取最终占据矩阵
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/dftu.rs`

use clap::{Args, Subcommand};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────
// Dftu 主命令
// ─────────────────────────────────────────────────────────────

/// dftu 主命令参数
#[derive(Args, Debug)]
pub struct DftuArgs {
    #[command(subcommand)]
    pub command: DftuCommands,
}

/// dftu 子命令
#[derive(Subcommand, Debug)]
pub enum DftuCommands {
    /// Show natpawu, lpawu and the spin setting read from an ABINIT input
    Info(SetupArgs),

    /// Generate random occupation matrices (dmatpawu)
    Random(RandomArgs),

    /// Extract the final occupation matrices from an ABINIT output
    Extract(ExtractArgs),
}

// ─────────────────────────────────────────────────────────────
// 公共设置
// ─────────────────────────────────────────────────────────────

/// ABINIT 输入与每个矩阵的电子数/连接标签
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// ABINIT input file
    #[arg(short, long, default_value = "abinit.in")]
    pub input: PathBuf,

    /// Electrons in the spin channel of each dmatpawu matrix, comma separated
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub electrons: Vec<usize>,

    /// Connection label of each matrix; equal labels share occupations
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub connections: Option<Vec<i64>>,
}

// ─────────────────────────────────────────────────────────────
// random 子命令
// ─────────────────────────────────────────────────────────────

/// random 子命令参数
#[derive(Args, Debug)]
pub struct RandomArgs {
    #[command(flatten)]
    pub setup: SetupArgs,

    /// Number of candidates to generate
    #[arg(short, long, default_value_t = 1)]
    pub number: usize,

    /// Seed for reproducible candidates
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the candidates (O, D, R and dmatpawu) as JSON
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ─────────────────────────────────────────────────────────────
// extract 子命令
// ─────────────────────────────────────────────────────────────

/// extract 子命令参数
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// ABINIT output file
    pub file: PathBuf,

    /// Print the full per-atom report instead of the dmatpawu line
    #[arg(long, default_value_t = false)]
    pub full: bool,
}
