//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `symmetry/`, `dftu/`, `utils/`
//! - 子模块: info, build, symmetry, supercell, convert, dftu

pub mod build;
pub mod convert;
pub mod dftu;
pub mod info;
pub mod supercell;
pub mod symmetry;

use crate::cli::Commands;
use crate::error::Result;
use crate::models::Structure;
use crate::parsers::{self, StructureFormat};
use crate::utils::output;
use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Build(args) => build::execute(args),
        Commands::Symmetry(args) => symmetry::execute(args),
        Commands::Supercell(args) => supercell::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Dftu(args) => dftu::execute(args),
    }
}

/// 写出结构或打印到终端（build / supercell / symmetry 共用）
pub(crate) fn emit_structure(
    structure: &Structure,
    output_path: Option<&Path>,
    format: Option<StructureFormat>,
) -> Result<()> {
    match output_path {
        Some(path) => {
            parsers::write_structure_file(structure, path, format)?;
            output::print_success(&format!(
                "Wrote {} ({} atoms) to {}",
                structure.name,
                structure.natom(),
                path.display()
            ));
        }
        None => match format {
            Some(format) => print!("{}", parsers::to_format_string(structure, format)?),
            None => println!("{}", structure),
        },
    }
    Ok(())
}
