//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 打印结构
//! - `build`: 按原型构造结构
//! - `symmetry`: 空间群分析（单文件或目录批量）
//! - `supercell`: 构造超胞
//! - `convert`: 批量格式转换
//! - `dftu`: DFT+U 占据矩阵辅助（嵌套子命令）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: info, build, symmetry, supercell, convert, dftu

pub mod build;
pub mod convert;
pub mod dftu;
pub mod info;
pub mod supercell;
pub mod symmetry;

use crate::parsers::StructureFormat;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// chemia - 晶体结构、对称性与超胞工具
#[derive(Parser)]
#[command(name = "chemia")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Crystal structures, space groups and supercells from the command line", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); CHEMIA_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Print a structure: atoms, periodicity and lattice vectors
    Info(info::InfoArgs),

    /// Build a structure from a prototype (fcc, bcc, rocksalt, ...)
    Build(build::BuildArgs),

    /// Find the space group of a structure or of every structure in a directory
    Symmetry(symmetry::SymmetryArgs),

    /// Build an NX x NY x NZ supercell
    Supercell(supercell::SupercellArgs),

    /// Convert structure files between formats (POSCAR, .cell, .xyz, .json, .cif)
    Convert(convert::ConvertArgs),

    /// DFT+U occupation matrix helpers for ABINIT
    Dftu(dftu::DftuArgs),
}

/// 结构文件格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// VASP POSCAR
    Poscar,
    /// CASTEP .cell
    Cell,
    /// (extended) XYZ
    Xyz,
    /// Crystallographic Information File (write only)
    Cif,
    /// chemia JSON
    Json,
}

impl From<FormatArg> for StructureFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Poscar => StructureFormat::Poscar,
            FormatArg::Cell => StructureFormat::Cell,
            FormatArg::Xyz => StructureFormat::Xyz,
            FormatArg::Cif => StructureFormat::Cif,
            FormatArg::Json => StructureFormat::Json,
        }
    }
}
