//! # XYZ 格式解析器
//!
//! 普通 XYZ 读为分子；扩展 XYZ 的注释行含 `Lattice="..."` 时读为周期结构，
//! `pbc="T T F"` 给出每个方向的周期性。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`
//! - 使用 `regex` 解析扩展 XYZ 注释行

use crate::error::{ChemiaError, Result};
use crate::models::elements::normalize_symbol;
use crate::models::{Lattice, Structure};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static LATTICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)lattice\s*=\s*"([^"]*)""#).expect("valid regex"));

static PBC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)pbc\s*=\s*"([^"]*)""#).expect("valid regex"));

/// 解析 XYZ 文件
pub fn parse_xyz_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_xyz_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 XYZ 格式
pub fn parse_xyz_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_err = |reason: String| ChemiaError::ParseError {
        format: "xyz".to_string(),
        path: default_name.to_string(),
        reason,
    };

    let natom: usize = lines
        .first()
        .and_then(|l| l.trim().parse().ok())
        .ok_or_else(|| parse_err("First line must be the number of atoms".to_string()))?;
    let comment = lines.get(1).copied().unwrap_or("");

    let available = lines.len().saturating_sub(2);
    if natom > available {
        return Err(parse_err(format!(
            "Expected {} atoms, found {}",
            natom, available
        )));
    }

    let mut symbols = Vec::with_capacity(natom);
    let mut positions = Vec::with_capacity(natom);
    for i in 0..natom {
        let line = lines
            .get(2 + i)
            .ok_or_else(|| parse_err(format!("Expected {} atoms, found {}", natom, i)))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let coords: Vec<f64> = parts
            .iter()
            .skip(1)
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.is_empty() || coords.len() < 3 {
            return Err(parse_err(format!("Invalid atom line {}", 3 + i)));
        }
        symbols.push(normalize_symbol(parts[0]));
        positions.push([coords[0], coords[1], coords[2]]);
    }

    let structure = match LATTICE_RE.captures(comment) {
        Some(caps) => {
            let values: Vec<f64> = caps[1]
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if values.len() != 9 {
                return Err(parse_err("Lattice must contain 9 numbers".to_string()));
            }
            let lattice = Lattice::from_vectors([
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ]);
            let periodicity = PBC_RE
                .captures(comment)
                .map(|c| parse_pbc(&c[1]))
                .unwrap_or([true; 3]);
            Structure::from_cartesian(symbols, lattice, positions)?.with_periodicity(periodicity)
        }
        None => Structure::molecule(symbols, positions)?,
    };

    let name = if LATTICE_RE.is_match(comment) || comment.trim().is_empty() {
        default_name.to_string()
    } else {
        comment.trim().to_string()
    };

    tracing::debug!("parsed xyz '{}' with {} atoms", name, structure.natom());
    Ok(structure.with_name(name))
}

fn parse_pbc(raw: &str) -> [bool; 3] {
    let mut pbc = [false; 3];
    for (flag, token) in pbc.iter_mut().zip(raw.split_whitespace()) {
        *flag = matches!(token.to_uppercase().as_str(), "T" | "TRUE" | "1");
    }
    pbc
}

/// 转换为 XYZ 格式；周期结构写为扩展 XYZ
pub fn to_xyz_string(structure: &Structure) -> String {
    let mut result = String::new();
    result.push_str(&format!("{}\n", structure.natom()));

    let periodicity = structure.periodicity();
    if periodicity.iter().any(|&p| p) {
        let m = structure.lattice().matrix;
        let lattice: Vec<String> = m.iter().flatten().map(|v| format!("{:.10}", v)).collect();
        let pbc: Vec<&str> = periodicity
            .iter()
            .map(|&p| if p { "T" } else { "F" })
            .collect();
        result.push_str(&format!(
            "Lattice=\"{}\" Properties=species:S:1:pos:R:3 pbc=\"{}\"\n",
            lattice.join(" "),
            pbc.join(" ")
        ));
    } else {
        result.push_str(&format!("{}\n", structure.name));
    }

    for (symbol, p) in structure.symbols().iter().zip(structure.positions().iter()) {
        result.push_str(&format!(
            "{} {:16.10} {:16.10} {:16.10}\n",
            symbol, p[0], p[1], p[2]
        ));
    }

    result
}
