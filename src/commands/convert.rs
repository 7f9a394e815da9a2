//! # convert 命令实现
//!
//! 批量转换结构文件格式。
//!
//! ## 功能
//! - 读取 POSCAR, .cell, .xyz, .json
//! - 转换为 POSCAR, .cell, .xyz, .json, .cif
//! - 目标文件已存在时跳过（除非 --overwrite）
//! - 并行处理
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/` 收集与并行执行
//! - 使用 `parsers/`, `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::ConvertArgs;
use crate::error::{ChemiaError, Result};
use crate::parsers::{self, StructureFormat};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    let target: StructureFormat = args.target.into();
    output::print_header(&format!("Converting to {} format", target));

    if !args.input.exists() {
        return Err(ChemiaError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    fs::create_dir_all(&args.output).map_err(|e| ChemiaError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let files = FileCollector::new(&args.input)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(ChemiaError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    output::print_info(&format!("Found {} files to convert", files.len()));

    let runner = BatchRunner::new(args.jobs);
    let result = runner.run(&files, |input_path| {
        match convert_file(input_path, &args.output, target, args.overwrite) {
            Ok(Some(out)) => ProcessResult::Success((input_path.clone(), out)),
            Ok(None) => ProcessResult::Skipped(input_path.display().to_string()),
            Err(e) => ProcessResult::Failed(input_path.display().to_string(), e.to_string()),
        }
    })?;

    if files.len() <= 10 {
        for (from, to) in &result.outputs {
            output::print_conversion(&from.display().to_string(), &to.display().to_string());
        }
    }
    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "Converted {} file(s) to '{}' in '{}' ({} skipped, {} failed)",
        result.success(),
        target,
        args.output.display(),
        result.skipped,
        result.failed()
    ));

    Ok(())
}

/// 转换单个文件；目标已存在且不覆盖时返回 None
fn convert_file(
    input_path: &Path,
    output_dir: &Path,
    target: StructureFormat,
    overwrite: bool,
) -> Result<Option<PathBuf>> {
    let stem = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .map(output_stem)
        .unwrap_or_else(|| "structure".to_string());

    let output_path = output_dir.join(target.output_file_name(&stem));
    if output_path.exists() && !overwrite {
        return Ok(None);
    }

    let structure = parsers::parse_structure_file(input_path)?;
    parsers::write_structure_file(&structure, &output_path, Some(target))?;
    Ok(Some(output_path))
}

/// POSCAR_001 -> 001, Au.cell -> Au, CONTCAR -> CONTCAR
fn output_stem(file_name: &str) -> String {
    for prefix in ["POSCAR_", "CONTCAR_"] {
        if let Some(rest) = file_name.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::prototypes::{build, Prototype, PrototypeParams};

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem("POSCAR_001"), "001");
        assert_eq!(output_stem("Au.cell"), "Au");
        assert_eq!(output_stem("CONTCAR"), "CONTCAR");
    }

    #[test]
    fn test_convert_file_and_skip_existing() {
        let dir = tempfile::tempdir().unwrap();
        let nacl = build(&PrototypeParams {
            prototype: Prototype::Rocksalt,
            elements: vec!["Na".to_string(), "Cl".to_string()],
            a: 5.64,
            c: None,
            conventional: true,
        })
        .unwrap();
        let input = dir.path().join("POSCAR_nacl");
        parsers::write_structure_file(&nacl, &input, None).unwrap();

        let out = convert_file(&input, dir.path(), StructureFormat::Cell, false)
            .unwrap()
            .unwrap();
        assert!(out.ends_with("nacl.cell"));
        assert_eq!(parsers::parse_structure_file(&out).unwrap().natom(), 8);

        assert!(convert_file(&input, dir.path(), StructureFormat::Cell, false)
            .unwrap()
            .is_none());
        assert!(convert_file(&input, dir.path(), StructureFormat::Cell, true)
            .unwrap()
            .is_some());
    }
}
