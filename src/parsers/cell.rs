//! # CASTEP .cell 格式解析器
//!
//! 解析与生成 CASTEP 输入文件 .cell 格式。
//!
//! ## .cell 格式说明
//! ```text
//! %BLOCK LATTICE_CART
//! ang
//! a1 a2 a3
//! b1 b2 b3
//! c1 c2 c3
//! %ENDBLOCK LATTICE_CART
//!
//! %BLOCK POSITIONS_FRAC
//! Element x y z
//! ...
//! %ENDBLOCK POSITIONS_FRAC
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{ChemiaError, Result};
use crate::models::elements::normalize_symbol;
use crate::models::{Lattice, Structure};
use std::fs;
use std::path::Path;

const BOHR_TO_ANGSTROM: f64 = 0.529_177_210_903;

/// 解析 .cell 文件
pub fn parse_cell_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_cell_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 .cell 格式
pub fn parse_cell_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_err = |reason: String| ChemiaError::ParseError {
        format: "cell".to_string(),
        path: default_name.to_string(),
        reason,
    };

    // 解析 LATTICE_CART 或 LATTICE_ABC
    let lattice = if let Some(block) = find_block(&lines, "LATTICE_CART") {
        parse_lattice_cart(&block).map_err(parse_err)?
    } else if let Some(block) = find_block(&lines, "LATTICE_ABC") {
        parse_lattice_abc(&block).map_err(parse_err)?
    } else {
        return Err(parse_err(
            "Missing LATTICE_CART or LATTICE_ABC block".to_string(),
        ));
    };

    // 解析 POSITIONS_FRAC 或 POSITIONS_ABS
    let structure = if let Some(block) = find_block(&lines, "POSITIONS_FRAC") {
        let (symbols, coords) = parse_positions(&block, 1.0);
        Structure::from_reduced(symbols, lattice, coords)?
    } else if let Some(block) = find_block(&lines, "POSITIONS_ABS") {
        let scale = unit_scale(&block);
        let (symbols, coords) = parse_positions(&block, scale);
        Structure::from_cartesian(symbols, lattice, coords)?
    } else {
        return Err(parse_err(
            "Missing POSITIONS_FRAC or POSITIONS_ABS block".to_string(),
        ));
    };

    tracing::debug!("parsed cell '{}' with {} atoms", default_name, structure.natom());
    Ok(structure.with_name(default_name))
}

/// 取出 %BLOCK NAME ... %ENDBLOCK NAME 之间的有效行（去掉注释和空行）
fn find_block<'a>(lines: &[&'a str], block_name: &str) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|line| {
        let mut parts = line.split_whitespace();
        matches!(parts.next(), Some(kw) if kw.eq_ignore_ascii_case("%BLOCK"))
            && matches!(parts.next(), Some(name) if name.eq_ignore_ascii_case(block_name))
    })?;

    Some(
        lines
            .iter()
            .skip(start + 1)
            .map(|&l| l.trim())
            .take_while(|l| !l.to_uppercase().starts_with("%ENDBLOCK"))
            .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
            .collect(),
    )
}

/// 块首行的长度单位换算到 Å
fn unit_scale(block: &[&str]) -> f64 {
    match block.first().map(|l| l.to_lowercase()) {
        Some(u) if u == "bohr" || u == "a0" => BOHR_TO_ANGSTROM,
        Some(u) if u == "nm" => 10.0,
        _ => 1.0,
    }
}

fn is_unit_line(line: &str) -> bool {
    ["ang", "bohr", "a0", "nm"]
        .iter()
        .any(|u| line.eq_ignore_ascii_case(u))
}

/// 解析 LATTICE_CART 块
fn parse_lattice_cart(block: &[&str]) -> std::result::Result<Lattice, String> {
    let scale = unit_scale(block);
    let rows: Vec<[f64; 3]> = block
        .iter()
        .filter(|l| !is_unit_line(l))
        .filter_map(|l| {
            let parts: Vec<f64> = l
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            (parts.len() >= 3).then(|| [parts[0] * scale, parts[1] * scale, parts[2] * scale])
        })
        .collect();

    if rows.len() < 3 {
        return Err("Incomplete LATTICE_CART block".to_string());
    }

    Ok(Lattice::from_vectors([rows[0], rows[1], rows[2]]))
}

/// 解析 LATTICE_ABC 块
fn parse_lattice_abc(block: &[&str]) -> std::result::Result<Lattice, String> {
    let scale = unit_scale(block);
    let params: Vec<f64> = block
        .iter()
        .filter(|l| !is_unit_line(l))
        .flat_map(|l| l.split_whitespace())
        .filter_map(|s| s.parse().ok())
        .collect();

    if params.len() < 6 {
        return Err("Incomplete LATTICE_ABC block (need a b c alpha beta gamma)".to_string());
    }

    Ok(Lattice::from_parameters(
        params[0] * scale,
        params[1] * scale,
        params[2] * scale,
        params[3],
        params[4],
        params[5],
    ))
}

/// 解析原子位置块，元素标签如 "Fe1" 规范为 "Fe"
fn parse_positions(block: &[&str], scale: f64) -> (Vec<String>, Vec<[f64; 3]>) {
    let mut symbols = Vec::new();
    let mut coords = Vec::new();

    for line in block.iter().filter(|l| !is_unit_line(l)) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            continue;
        }
        if let (Ok(x), Ok(y), Ok(z)) = (
            parts[1].parse::<f64>(),
            parts[2].parse::<f64>(),
            parts[3].parse::<f64>(),
        ) {
            symbols.push(normalize_symbol(parts[0]));
            coords.push([x * scale, y * scale, z * scale]);
        }
    }

    (symbols, coords)
}

/// 将 Structure 转换为 .cell 格式字符串
pub fn to_cell_string(structure: &Structure) -> String {
    let mut result = String::new();

    // LATTICE_CART 块
    result.push_str("%BLOCK LATTICE_CART\nang\n");
    for row in &structure.lattice().matrix {
        result.push_str(&format!(
            "{:16.10} {:16.10} {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }
    result.push_str("%ENDBLOCK LATTICE_CART\n\n");

    // POSITIONS_FRAC 块
    result.push_str("%BLOCK POSITIONS_FRAC\n");
    for (symbol, p) in structure
        .symbols()
        .iter()
        .zip(structure.reduced_positions().iter())
    {
        result.push_str(&format!(
            "{:4} {:16.10} {:16.10} {:16.10}\n",
            symbol, p[0], p[1], p[2]
        ));
    }
    result.push_str("%ENDBLOCK POSITIONS_FRAC\n");

    result
}
