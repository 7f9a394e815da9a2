//! # symmetry 命令实现
//!
//! 单个结构：打印空间群、晶系、Wyckoff 位置，可选列出对称操作并写出
//! 精化后的惯用晶胞/原胞。
//! 目录：并行分析每个结构，打印汇总表并可导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/symmetry.rs` 定义的参数
//! - 使用 `symmetry/`, `parsers/`, `batch/`
//! - 使用 `utils/output.rs`, `tabled`, `csv`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::symmetry::SymmetryArgs;
use crate::error::{ChemiaError, Result};
use crate::models::Structure;
use crate::parsers::{self, cif, StructureFormat};
use crate::symmetry::{CrystalSymmetry, SymmetryOptions, SymmetrySummary};
use crate::utils::output;

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Structure")]
    name: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "No.")]
    number: i32,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "System")]
    system: String,
    #[tabled(rename = "Pearson")]
    pearson: String,
    #[tabled(rename = "Ops")]
    operations: usize,
}

impl From<&SymmetrySummary> for SummaryRow {
    fn from(s: &SymmetrySummary) -> Self {
        Self {
            name: s.name.clone(),
            formula: s.formula.clone(),
            number: s.number,
            symbol: s.symbol.clone(),
            system: s.crystal_system.clone(),
            pearson: s.pearson_symbol.clone(),
            operations: s.num_operations,
        }
    }
}

/// 执行 symmetry 命令
pub fn execute(args: SymmetryArgs) -> Result<()> {
    let options = SymmetryOptions {
        symprec: args.symprec,
        angle_tolerance: args.angle_tolerance,
    };

    if args.input.is_dir() {
        analyze_directory(&args, options)
    } else {
        analyze_file(&args, options)
    }
}

fn analyze_file(args: &SymmetryArgs, options: SymmetryOptions) -> Result<()> {
    let structure = parsers::parse_structure_file(&args.input)?;
    let symm = CrystalSymmetry::with_options(&structure, options)?;

    output::print_header(&format!("Symmetry: {}", structure.name));
    output::print_field("Formula", structure.formula());
    output::print_field("Space group", format!("{} ({})", symm.symbol(), symm.number()));
    if let Some(system) = symm.crystal_system() {
        output::print_field("Crystal system", system);
    }
    output::print_field("Pearson symbol", symm.pearson_symbol());
    output::print_field("Hall number", symm.hall_number());
    output::print_field("Operations", symm.num_operations());
    output::print_field("symprec (Å)", options.symprec);

    let wyckoffs: Vec<String> = structure
        .symbols()
        .iter()
        .zip(symm.wyckoff_letters())
        .map(|(s, w)| format!("{}:{}", s, w))
        .collect();
    output::print_field("Wyckoff", wyckoffs.join(" "));

    if args.operations {
        println!();
        output::print_info("Symmetry operations (fractional, x' = R x + t)");
        for (i, op) in symm.operations().iter().enumerate() {
            let r = op.rotation;
            println!(
                " {:>3}  [{:>2} {:>2} {:>2} | {:>2} {:>2} {:>2} | {:>2} {:>2} {:>2}]  t = ({:.4}, {:.4}, {:.4})",
                i + 1,
                r[0][0], r[0][1], r[0][2],
                r[1][0], r[1][1], r[1][2],
                r[2][0], r[2][1], r[2][2],
                op.translation[0], op.translation[1], op.translation[2]
            );
        }
    }

    if let Some(path) = &args.refine {
        write_standard_cell(&symm.refine_cell()?, path, &symm)?;
    }
    if let Some(path) = &args.primitive {
        write_standard_cell(&symm.find_primitive()?, path, &symm)?;
    }

    Ok(())
}

/// CIF 输出在首行注明空间群
fn write_standard_cell(structure: &Structure, path: &Path, symm: &CrystalSymmetry) -> Result<()> {
    if StructureFormat::from_path(path) != Some(StructureFormat::Cif) {
        return super::emit_structure(structure, Some(path), None);
    }

    let note = format!(
        "space group {} ({}), symprec {}",
        symm.symbol(),
        symm.number(),
        symm.options().symprec
    );
    fs::write(path, cif::to_cif_string(structure, Some(&note))).map_err(|e| {
        ChemiaError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        }
    })?;
    output::print_success(&format!(
        "Wrote {} ({} atoms) to {}",
        structure.name,
        structure.natom(),
        path.display()
    ));
    Ok(())
}

fn analyze_directory(args: &SymmetryArgs, options: SymmetryOptions) -> Result<()> {
    output::print_header(&format!("Space groups under {}", args.input.display()));

    let files = FileCollector::new(&args.input)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;
    if files.is_empty() {
        return Err(ChemiaError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }
    output::print_info(&format!("Found {} structures", files.len()));

    let result = BatchRunner::new(args.jobs).run(&files, |path| {
        match summarize(path, options) {
            Ok(summary) => ProcessResult::Success(summary),
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        }
    })?;

    let rows: Vec<SummaryRow> = result.outputs.iter().map(SummaryRow::from).collect();
    if !rows.is_empty() {
        println!("{}", Table::new(&rows));
    }
    for (path, err) in &result.failures {
        output::print_warning(&format!("{}: {}", path, err));
    }

    if let Some(csv_path) = &args.csv {
        save_summary_csv(&result.outputs, csv_path)?;
        output::print_success(&format!("Summary saved to {}", csv_path.display()));
    }

    output::print_done(&format!(
        "Analyzed {} structure(s), {} failed",
        result.success(),
        result.failed()
    ));
    Ok(())
}

fn summarize(path: &Path, options: SymmetryOptions) -> Result<SymmetrySummary> {
    let structure = parsers::parse_structure_file(path)?;
    let mut summary = CrystalSymmetry::with_options(&structure, options)?.summary();
    summary.name = path.display().to_string();
    Ok(summary)
}

/// 导出汇总 CSV
fn save_summary_csv(summaries: &[SymmetrySummary], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush().map_err(|e| ChemiaError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
