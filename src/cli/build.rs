//! # build 子命令 CLI 定义
//!
//! 由原型名、元素和晶格常数生成结构。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/build.rs`

use super::FormatArg;
use crate::models::Prototype;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 原型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PrototypeArg {
    /// Simple cubic
    Sc,
    /// Body-centred cubic
    Bcc,
    /// Face-centred cubic
    Fcc,
    /// Hexagonal close packed
    Hcp,
    /// Diamond
    Diamond,
    /// Rock salt (two elements)
    Rocksalt,
    /// Cubic perovskite ABX3 (three elements)
    Perovskite,
}

impl From<PrototypeArg> for Prototype {
    fn from(arg: PrototypeArg) -> Self {
        match arg {
            PrototypeArg::Sc => Prototype::SimpleCubic,
            PrototypeArg::Bcc => Prototype::Bcc,
            PrototypeArg::Fcc => Prototype::Fcc,
            PrototypeArg::Hcp => Prototype::Hcp,
            PrototypeArg::Diamond => Prototype::Diamond,
            PrototypeArg::Rocksalt => Prototype::Rocksalt,
            PrototypeArg::Perovskite => Prototype::Perovskite,
        }
    }
}

/// build 子命令参数
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Prototype to build
    #[arg(short, long, value_enum)]
    pub prototype: PrototypeArg,

    /// Element symbols, comma separated (e.g. Na,Cl)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub elements: Vec<String>,

    /// Lattice constant a (Å)
    #[arg(short)]
    pub a: f64,

    /// Lattice constant c for hcp (Å), ideal c/a when omitted
    #[arg(short)]
    pub c: Option<f64>,

    /// Build the conventional cubic cell instead of the primitive cell
    #[arg(long, default_value_t = false)]
    pub conventional: bool,

    /// Output file; the structure is printed when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (inferred from the output name when omitted)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}
