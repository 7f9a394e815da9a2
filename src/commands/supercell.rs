//! # supercell 命令实现
//!
//! ## 依赖关系
//! - 使用 `cli/supercell.rs` 定义的参数
//! - 使用 `parsers/`, `models/structure.rs`

use crate::cli::supercell::SupercellArgs;
use crate::error::{ChemiaError, Result};
use crate::parsers;
use crate::utils::output;

/// 执行 supercell 命令
pub fn execute(args: SupercellArgs) -> Result<()> {
    let size: [usize; 3] = args.size.as_slice().try_into().map_err(|_| {
        ChemiaError::InvalidArgument(format!(
            "--size needs three integers, got {}",
            args.size.len()
        ))
    })?;

    let structure = parsers::parse_structure_file(&args.file)?;
    let supercell = structure.supercell(size)?;

    if args.output.is_some() {
        output::print_info(&format!(
            "{} atoms -> {} atoms ({}x{}x{})",
            structure.natom(),
            supercell.natom(),
            size[0],
            size[1],
            size[2]
        ));
    }

    super::emit_structure(
        &supercell,
        args.output.as_deref(),
        args.format.map(Into::into),
    )
}
