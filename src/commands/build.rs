//! # build 命令实现
//!
//! 由原型生成结构并写出或打印。
//!
//! ## 依赖关系
//! - 使用 `cli/build.rs` 定义的参数
//! - 使用 `models/prototypes.rs`

use crate::cli::build::BuildArgs;
use crate::error::Result;
use crate::models::elements::normalize_symbol;
use crate::models::prototypes::{self, PrototypeParams};

/// 执行 build 命令
pub fn execute(args: BuildArgs) -> Result<()> {
    let params = PrototypeParams {
        prototype: args.prototype.into(),
        elements: args.elements.iter().map(|e| normalize_symbol(e)).collect(),
        a: args.a,
        c: args.c,
        conventional: args.conventional,
    };

    let structure = prototypes::build(&params)?;
    tracing::info!(
        "built {} with {} atoms",
        structure.name,
        structure.natom()
    );

    super::emit_structure(
        &structure,
        args.output.as_deref(),
        args.format.map(Into::into),
    )
}
