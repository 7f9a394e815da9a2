//! # ABINIT 输出中的 DFT+U 占据矩阵
//!
//! 从输出文件最后一个 `LDA+U DATA` 块中读取每个关联原子的占据数与占据矩阵：
//!
//! ```text
//!  ====== For Atom   1, occupations for correlated orbitals. lpawu =  2
//!   Atom   1. Occ. for lpawu and for spin 1 =  4.53543
//!   Atom   1. Occ. for lpawu and for spin 2 =  3.96413
//!   == Occupation matrix for correlated orbitals:
//!
//!   Occupation matrix for spin  1
//!      0.98807  -0.00000  ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/dftu.rs` 使用
//! - 使用 `regex`

use crate::error::{ChemiaError, Result};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ATOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"For Atom\s*(\d+),\s*occupations for correlated orbitals\.\s*lpawu\s*=\s*(\d+)")
        .expect("valid regex")
});

static OCC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Occ\. for lpawu and for spin\s*(\d+)\s*=\s*([-+0-9.eEdD]+)").expect("valid regex")
});

static MATRIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Occupation matrix for spin\s+(\d+)").expect("valid regex"));

const BLOCK_MARKER: &str = "LDA+U DATA";

/// 一个关联原子的最终占据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelatedAtom {
    /// 原子序号（从 1 开始）
    pub atom: usize,
    pub lpawu: usize,
    /// 每个自旋通道的总占据
    pub occupations: Vec<f64>,
    /// 每个自旋通道的占据矩阵，按行展开
    pub matrices: Vec<Vec<f64>>,
}

impl CorrelatedAtom {
    pub fn ndim(&self) -> usize {
        2 * self.lpawu + 1
    }
}

pub fn parse_output_file(path: &Path) -> Result<Vec<CorrelatedAtom>> {
    let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_correlation_matrices(&content)
}

/// 解析最后一个 LDA+U DATA 块
pub fn parse_correlation_matrices(text: &str) -> Result<Vec<CorrelatedAtom>> {
    let start = text.rfind(BLOCK_MARKER).ok_or_else(|| {
        ChemiaError::DftuError(format!("no '{}' block in ABINIT output", BLOCK_MARKER))
    })?;

    let lines: Vec<&str> = text[start..].lines().skip(1).collect();
    let mut atoms: Vec<CorrelatedAtom> = Vec::new();
    let mut blank_run = 0;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run >= 2 && !atoms.is_empty() {
                break;
            }
            continue;
        }
        blank_run = 0;

        if let Some(caps) = ATOM_RE.captures(line) {
            atoms.push(CorrelatedAtom {
                atom: caps[1].parse().map_err(|_| bad_line(line))?,
                lpawu: caps[2].parse().map_err(|_| bad_line(line))?,
                occupations: Vec::new(),
                matrices: Vec::new(),
            });
            continue;
        }

        let Some(current) = atoms.last_mut() else {
            continue;
        };

        if let Some(caps) = OCC_RE.captures(line) {
            let value = caps[2]
                .replace(['d', 'D'], "e")
                .parse()
                .map_err(|_| bad_line(line))?;
            current.occupations.push(value);
        } else if MATRIX_RE.is_match(line) {
            let ndim = current.ndim();
            let mut matrix = Vec::with_capacity(ndim * ndim);
            while matrix.len() < ndim * ndim && i < lines.len() {
                let row = lines[i];
                i += 1;
                if row.trim().is_empty() {
                    continue;
                }
                let values = row
                    .split_whitespace()
                    .map(|t| t.parse::<f64>().map_err(|_| bad_line(row)))
                    .collect::<Result<Vec<_>>>()?;
                if values.len() != ndim {
                    return Err(bad_line(row));
                }
                matrix.extend(values);
            }
            if matrix.len() != ndim * ndim {
                return Err(ChemiaError::DftuError(format!(
                    "truncated occupation matrix for atom {}",
                    current.atom
                )));
            }
            current.matrices.push(matrix);
        }
    }

    if atoms.is_empty() {
        return Err(ChemiaError::DftuError(
            "LDA+U DATA block holds no correlated atoms".to_string(),
        ));
    }

    tracing::debug!("read occupation matrices for {} atoms", atoms.len());
    Ok(atoms)
}

/// 最终 dmatpawu：依次拼接每个原子的自旋 1 矩阵
pub fn final_dmatpawu(text: &str) -> Result<Vec<f64>> {
    spin_one_dmatpawu(&parse_correlation_matrices(text)?)
}

pub fn spin_one_dmatpawu(atoms: &[CorrelatedAtom]) -> Result<Vec<f64>> {
    let mut dmatpawu = Vec::new();
    for atom in atoms {
        let first = atom.matrices.first().ok_or_else(|| {
            ChemiaError::DftuError(format!("no occupation matrix for atom {}", atom.atom))
        })?;
        dmatpawu.extend_from_slice(first);
    }
    Ok(dmatpawu)
}

fn bad_line(line: &str) -> ChemiaError {
    ChemiaError::DftuError(format!("cannot parse line '{}'", line.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(atom: usize, diag1: f64, diag2: f64) -> String {
        let mut s = format!(
            " ====== For Atom   {}, occupations for correlated orbitals. lpawu =  1\n",
            atom
        );
        s.push_str(&format!(
            "  Atom   {}. Occ. for lpawu and for spin 1 =  {:.5}\n",
            atom,
            3.0 * diag1
        ));
        s.push_str(&format!(
            "  Atom   {}. Occ. for lpawu and for spin 2 =  {:.5}\n",
            atom,
            3.0 * diag2
        ));
        s.push_str(&format!(
            "  => On atom   {} ,  local Mag. for lpawu is   {:.6}\n",
            atom,
            3.0 * (diag1 - diag2)
        ));
        s.push_str("  == Occupation matrix for correlated orbitals:\n\n");
        for (spin, d) in [(1, diag1), (2, diag2)] {
            s.push_str(&format!("  Occupation matrix for spin  {}\n", spin));
            for r in 0..3 {
                let row: Vec<String> = (0..3)
                    .map(|c| format!("{:9.5}", if r == c { d } else { -0.0 }))
                    .collect();
                s.push_str(&format!("    {}\n", row.join(" ")));
            }
        }
        s
    }

    fn output() -> String {
        let mut text = String::from(" ==== LDA+U DATA =====\n\n");
        text.push_str(&block(1, 0.1, 0.1));
        text.push_str("\n\n\n iteration 2\n\n ==== LDA+U DATA =====\n\n");
        text.push_str(&block(1, 0.9, 0.2));
        text.push('\n');
        text.push_str(&block(2, 0.3, 0.8));
        text.push_str("\n\n\n Total energy = -123.456\n");
        text
    }

    #[test]
    fn test_parse_last_block() {
        let atoms = parse_correlation_matrices(&output()).unwrap();
        assert_eq!(atoms.len(), 2);

        assert_eq!(atoms[0].atom, 1);
        assert_eq!(atoms[0].lpawu, 1);
        assert_eq!(atoms[0].matrices.len(), 2);
        assert!((atoms[0].occupations[0] - 2.7).abs() < 1e-6);
        assert!((atoms[0].matrices[0][0] - 0.9).abs() < 1e-6);
        assert!((atoms[1].matrices[1][8] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_final_dmatpawu_takes_spin_one() {
        let dmat = final_dmatpawu(&output()).unwrap();
        assert_eq!(dmat.len(), 18);
        assert!((dmat[0] - 0.9).abs() < 1e-6);
        assert!((dmat[9] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_missing_block() {
        assert!(parse_correlation_matrices("nothing here").is_err());
    }

    #[test]
    fn test_truncated_matrix() {
        let mut text = String::from(" ==== LDA+U DATA =====\n");
        text.push_str(" ====== For Atom   1, occupations for correlated orbitals. lpawu =  1\n");
        text.push_str("  Occupation matrix for spin  1\n  0.1 0.0 0.0\n");
        assert!(parse_correlation_matrices(&text).is_err());
    }
}
