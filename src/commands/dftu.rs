//! # dftu 命令实现
//!
//! ## 功能
//! - `info`: 打印由 ABINIT 输入推断的 DFT+U 设置
//! - `random`: 生成随机占据矩阵候选，输出 dmatpawu 或 JSON
//! - `extract`: 读取 ABINIT 输出中的最终占据矩阵
//!
//! ## 依赖关系
//! - 使用 `cli/dftu.rs` 定义的参数
//! - 使用 `dftu/`
//! - 使用 `utils/output.rs`

use crate::cli::dftu::{DftuArgs, DftuCommands, ExtractArgs, RandomArgs, SetupArgs};
use crate::dftu::{output as abinit_output, OccupationParams, OrbitalDftu};
use crate::error::{ChemiaError, Result};
use crate::utils::output;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;

/// 导出的候选
#[derive(Debug, Serialize, Deserialize)]
struct Candidate {
    params: OccupationParams,
    dmatpawu: Vec<f64>,
}

/// 执行 dftu 命令
pub fn execute(args: DftuArgs) -> Result<()> {
    match args.command {
        DftuCommands::Info(setup) => info(setup),
        DftuCommands::Random(random_args) => random(random_args),
        DftuCommands::Extract(extract_args) => extract(extract_args),
    }
}

fn load(setup: SetupArgs) -> Result<OrbitalDftu> {
    // 未给出连接标签时每个矩阵独立
    let connections = setup
        .connections
        .unwrap_or_else(|| (0..setup.electrons.len() as i64).collect());
    OrbitalDftu::from_abinit_input(&setup.input, setup.electrons, connections)
}

fn info(setup: SetupArgs) -> Result<()> {
    let input = setup.input.clone();
    let dftu = load(setup)?;
    output::print_header(&format!("DFT+U setup from {}", input.display()));
    println!("{}", dftu);
    Ok(())
}

fn random(args: RandomArgs) -> Result<()> {
    if args.number == 0 {
        return Err(ChemiaError::InvalidArgument(
            "--number must be at least 1".to_string(),
        ));
    }

    let dftu = load(args.setup)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let candidates = generate_candidates(&dftu, args.number, &mut rng)?;
    for warning in duplicate_warnings(&dftu, &candidates)? {
        output::print_warning(&warning);
    }

    match &args.output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&candidates)?;
            fs::write(path, json).map_err(|e| ChemiaError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_success(&format!(
                "Wrote {} candidate(s) to {}",
                candidates.len(),
                path.display()
            ));
        }
        None => {
            for (i, candidate) in candidates.iter().enumerate() {
                println!("# candidate {}", i + 1);
                print_dmatpawu(&candidate.dmatpawu, dftu.ndim());
            }
        }
    }
    Ok(())
}

fn generate_candidates<R: Rng + ?Sized>(
    dftu: &OrbitalDftu,
    number: usize,
    rng: &mut R,
) -> Result<Vec<Candidate>> {
    (0..number)
        .map(|_| {
            let params = dftu.random_params(&mut *rng);
            let dmatpawu = dftu.to_dmatpawu(&params)?;
            Ok(Candidate { params, dmatpawu })
        })
        .collect()
}

/// 候选编号从 1 开始
fn duplicate_warnings(dftu: &OrbitalDftu, candidates: &[Candidate]) -> Result<Vec<String>> {
    let params: Vec<OccupationParams> = candidates.iter().map(|c| c.params.clone()).collect();
    Ok(dftu
        .check_duplicates(&params)?
        .into_iter()
        .map(|(first, same)| {
            format!(
                "candidate {} is duplicated by {:?}",
                first + 1,
                same.iter().map(|j| j + 1).collect::<Vec<_>>()
            )
        })
        .collect())
}

fn extract(args: ExtractArgs) -> Result<()> {
    let atoms = abinit_output::parse_output_file(&args.file)?;

    if args.full {
        output::print_header(&format!("Occupation matrices in {}", args.file.display()));
        for atom in &atoms {
            output::print_info(&format!(
                "Atom {} (lpawu = {}), occupations {:?}",
                atom.atom, atom.lpawu, atom.occupations
            ));
            for (spin, matrix) in atom.matrices.iter().enumerate() {
                println!("  spin {}", spin + 1);
                print_dmatpawu(matrix, atom.ndim());
            }
        }
        return Ok(());
    }

    let ndim = atoms.first().map(|a| a.ndim()).unwrap_or(1);
    let dmatpawu = abinit_output::spin_one_dmatpawu(&atoms)?;
    println!("dmatpawu");
    print_dmatpawu(&dmatpawu, ndim);
    Ok(())
}

fn print_dmatpawu(values: &[f64], ndim: usize) {
    print!("{}", format_dmatpawu(values, ndim));
}

/// 按 ABINIT 输入习惯每行 ndim 个数，矩阵之间空一行
fn format_dmatpawu(values: &[f64], ndim: usize) -> String {
    let ndim = ndim.max(1);
    let mut text = String::new();
    for (i, row) in values.chunks(ndim).enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:10.6}", v)).collect();
        text.push_str(&format!("   {}\n", cells.join(" ")));
        if (i + 1) % ndim == 0 && (i + 1) * ndim < values.len() {
            text.push('\n');
        }
    }
    text
}
