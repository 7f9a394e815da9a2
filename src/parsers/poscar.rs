//! # VASP POSCAR 格式解析器
//!
//! 解析与生成 VASP POSCAR/CONTCAR 文件格式。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! VASP 4 文件没有元素行，此时从注释行读取元素符号。
//! 负的缩放因子表示目标体积 (Å³)。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{ChemiaError, Result};
use crate::models::elements::{is_valid_symbol, normalize_symbol};
use crate::models::{Lattice, Structure};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_err = |reason: String| ChemiaError::ParseError {
        format: "poscar".to_string(),
        path: default_name.to_string(),
        reason,
    };

    if lines.len() < 7 {
        return Err(parse_err("File too short".to_string()));
    }

    // Line 0: Comment/name
    let comment = lines[0].trim();
    let name = if comment.is_empty() {
        default_name.to_string()
    } else {
        comment.to_string()
    };

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_err("Invalid scaling factor".to_string()))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_err(format!("Invalid lattice vector at line {}", 3 + i)));
        }
        *row = [parts[0], parts[1], parts[2]];
    }

    // 负缩放因子 = 目标体积
    let factor = if scale < 0.0 {
        let raw_volume = Lattice::from_vectors(matrix).volume().abs();
        (scale.abs() / raw_volume).cbrt()
    } else {
        scale
    };
    for row in matrix.iter_mut() {
        for v in row.iter_mut() {
            *v *= factor;
        }
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    let first = line5_parts
        .first()
        .ok_or_else(|| parse_err("Missing species line".to_string()))?;

    let (elements, counts, mut coord_line) = if first.parse::<usize>().is_ok() {
        // VASP 4 format: no element line, take symbols from the comment
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let elements: Vec<String> = comment
            .split_whitespace()
            .map(normalize_symbol)
            .filter(|s| is_valid_symbol(s))
            .take(counts.len())
            .collect();
        if elements.len() != counts.len() {
            return Err(parse_err(
                "VASP 4 file without element symbols in the comment line".to_string(),
            ));
        }
        (elements, counts, 6)
    } else {
        let elements: Vec<String> = line5_parts
            .iter()
            .map(|&s| normalize_symbol(s.split('/').next().unwrap_or(s)))
            .collect();
        let counts: Vec<usize> = lines
            .get(6)
            .map(|l| l.split_whitespace().filter_map(|s| s.parse().ok()).collect())
            .unwrap_or_default();
        (elements, counts, 7)
    };

    if elements.len() != counts.len() {
        return Err(parse_err(format!(
            "{} element symbols but {} counts",
            elements.len(),
            counts.len()
        )));
    }

    // Check for "Selective dynamics" line
    if lines
        .get(coord_line)
        .is_some_and(|l| l.trim().to_lowercase().starts_with('s'))
    {
        coord_line += 1;
    }

    // Coordinate type line
    let coord_type = lines
        .get(coord_line)
        .map(|l| l.trim().to_lowercase())
        .ok_or_else(|| parse_err("Missing coordinate type line".to_string()))?;
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let available = lines.len().saturating_sub(coord_line + 1);
    let total = counts
        .iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n))
        .filter(|&total| total <= available)
        .ok_or_else(|| {
            parse_err(format!(
                "Atom counts {:?} exceed the {} position lines present",
                counts, available
            ))
        })?;
    let mut symbols = Vec::with_capacity(total);
    let mut coords = Vec::with_capacity(total);
    let mut line_idx = coord_line + 1;

    for (elem, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let parts: Vec<f64> = lines
                .get(line_idx)
                .map(|l| {
                    l.split_whitespace()
                        .take(3)
                        .filter_map(|s| s.parse().ok())
                        .collect()
                })
                .unwrap_or_default();

            if parts.len() < 3 {
                return Err(parse_err(format!(
                    "Expected {} positions, invalid line {}",
                    total,
                    line_idx + 1
                )));
            }

            symbols.push(elem.clone());
            coords.push([parts[0], parts[1], parts[2]]);
            line_idx += 1;
        }
    }

    let structure = if is_cartesian {
        let coords = coords
            .into_iter()
            .map(|p| [p[0] * factor, p[1] * factor, p[2] * factor])
            .collect();
        Structure::from_cartesian(symbols, lattice, coords)?
    } else {
        Structure::from_reduced(symbols, lattice, coords)?
    };

    tracing::debug!("parsed POSCAR '{}' with {} atoms", name, structure.natom());
    Ok(structure.with_name(name))
}

/// 将 Structure 转换为 POSCAR 格式字符串（按元素分组）
pub fn to_poscar_string(structure: &Structure) -> String {
    let species = structure.species();
    let mut result = String::new();

    // Line 0: Comment
    let name = if structure.name.is_empty() {
        structure.formula()
    } else {
        structure.name.clone()
    };
    result.push_str(&format!("{}\n", name));

    // Line 1: Scale
    result.push_str("1.0\n");

    // Lines 2-4: Lattice
    for row in &structure.lattice().matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    // Line 5: Elements
    result.push_str(&format!("   {}\n", species.join("   ")));

    // Line 6: Counts
    let composition = structure.composition();
    let counts: Vec<String> = species
        .iter()
        .map(|e| composition.get(e).copied().unwrap_or(0).to_string())
        .collect();
    result.push_str(&format!("   {}\n", counts.join("   ")));

    // Coordinate type
    result.push_str("Direct\n");

    // Atom positions
    for elem in &species {
        for (symbol, pos) in structure
            .symbols()
            .iter()
            .zip(structure.reduced_positions().iter())
        {
            if symbol == elem {
                result.push_str(&format!(
                    "  {:16.10}  {:16.10}  {:16.10}\n",
                    pos[0], pos[1], pos[2]
                ));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_poscar_vasp5() {
        let content = r#"NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
4 4
Direct
0.0 0.0 0.0
0.5 0.5 0.0
0.5 0.0 0.5
0.0 0.5 0.5
0.5 0.0 0.0
0.0 0.5 0.0
0.0 0.0 0.5
0.5 0.5 0.5
"#;
        let s = parse_poscar_content(content, "NaCl").unwrap();
        assert_eq!(s.name, "NaCl");
        assert_eq!(s.natom(), 8);
        assert_eq!(s.composition()["Na"], 4);
        assert_eq!(s.composition()["Cl"], 4);
    }

    #[test]
    fn test_parse_poscar_with_scale() {
        let content = r#"Si
2.0
2.0 0.0 0.0
0.0 2.0 0.0
0.0 0.0 2.0
Si
2
Direct
0.0 0.0 0.0
0.5 0.5 0.5
"#;
        let s = parse_poscar_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = s.lattice().parameters();

        // 2.0 * 2.0 = 4.0
        assert!((a - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_poscar_negative_scale_is_volume() {
        let content = "Cu\n-64.0\n1 0 0\n0 1 0\n0 0 1\nCu\n1\nDirect\n0 0 0\n";
        let s = parse_poscar_content(content, "Cu").unwrap();
        assert!((s.volume() - 64.0).abs() < 1e-8);
    }

    #[test]
    fn test_parse_poscar_cartesian() {
        let content = r#"Fe bcc
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Cartesian
0.0 0.0 0.0
1.435 1.435 1.435
"#;
        let s = parse_poscar_content(content, "Fe").unwrap();
        let r = s.reduced_positions()[1];
        assert!((r[0] - 0.5).abs() < 1e-10);
        assert!((r[2] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_parse_poscar_vasp4_uses_comment() {
        let content = "Ga As zincblende\n5.65\n0 0.5 0.5\n0.5 0 0.5\n0.5 0.5 0\n1 1\nDirect\n0 0 0\n0.25 0.25 0.25\n";
        let s = parse_poscar_content(content, "GaAs").unwrap();
        assert_eq!(s.symbols(), &["Ga".to_string(), "As".to_string()]);
    }

    #[test]
    fn test_poscar_round_trip() {
        let s = Structure::from_reduced(
            vec!["O", "Ti", "O"],
            Lattice::cubic(4.0),
            vec![[0.5, 0.5, 0.0], [0.0, 0.0, 0.0], [0.5, 0.0, 0.5]],
        )
        .unwrap()
        .with_name("TiO2");

        let parsed = parse_poscar_content(&to_poscar_string(&s), "round_trip").unwrap();

        assert_eq!(parsed.natom(), 3);
        assert_eq!(parsed.formula(), "O2Ti");
        // 按元素分组后 O 在前
        assert_eq!(parsed.symbols()[1], "O");
        assert_eq!(parsed.name, "TiO2");
    }

    #[test]
    fn test_parse_poscar_selective_dynamics() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let s = parse_poscar_content(content, "Fe").unwrap();
        assert_eq!(s.natom(), 2);
    }

    #[test]
    fn test_parse_poscar_truncated_positions() {
        let content = "Fe\n1.0\n2.87 0 0\n0 2.87 0\n0 0 2.87\nFe\n2\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(content, "Fe").is_err());
    }

    #[test]
    fn test_parse_poscar_huge_counts() {
        let content = "Fe\n1.0\n2.87 0 0\n0 2.87 0\n0 0 2.87\nFe\n99999999999999999\nDirect\n0 0 0\n";
        let err = parse_poscar_content(content, "Fe").unwrap_err();
        assert!(matches!(err, ChemiaError::ParseError { .. }));

        let content = "Fe Co\n1.0\n2.87 0 0\n0 2.87 0\n0 0 2.87\nFe Co\n18446744073709551615 1\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(content, "FeCo").is_err());
    }
}
