//! # ABINIT 输入变量解析
//!
//! 读取 ABINIT 输入文件中的 `name value ...` 变量。
//!
//! ## 格式约定
//! - `#` 与 `!` 之后为注释
//! - 变量名以字母开头，其后直到下一个变量名之前的记号都是它的值
//! - `n*value` 展开为 n 个 value
//! - 单位记号 (eV, Ha, Bohr, Angstr 等) 被忽略
//!
//! ## 依赖关系
//! - 被 `dftu/population.rs` 使用

use crate::error::{ChemiaError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const UNITS: &[&str] = &[
    "ha", "hartree", "ev", "mev", "ry", "rydberg", "bohr", "au", "angstr", "angstrom", "nm", "k",
    "t", "tesla", "sec", "s",
];

/// `n*value` 中 n 的上限
const MAX_REPETITION: usize = 1 << 20;

/// ABINIT 输入变量集合
#[derive(Debug, Clone, Default)]
pub struct AbinitInput {
    variables: BTreeMap<String, Vec<String>>,
}

impl AbinitInput {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let input = Self::parse(&content)?;
        tracing::debug!(
            "parsed {} ABINIT variables from {}",
            input.variables.len(),
            path.display()
        );
        Ok(input)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut variables: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for line in content.lines() {
            let line = line.split(['#', '!']).next().unwrap_or("");
            for token in line.split_whitespace() {
                if is_variable_name(token) {
                    let name = token.to_lowercase();
                    variables.insert(name.clone(), Vec::new());
                    current = Some(name);
                    continue;
                }

                let name = current.as_ref().ok_or_else(|| ChemiaError::ParseError {
                    format: "abinit".to_string(),
                    path: String::new(),
                    reason: format!("value '{}' before any variable name", token),
                })?;

                if UNITS.contains(&token.to_lowercase().as_str()) {
                    continue;
                }

                let values = variables.entry(name.clone()).or_default();
                match token.split_once('*') {
                    Some((count, value)) if !count.is_empty() => {
                        let n: usize = count
                            .parse()
                            .ok()
                            .filter(|&n| n <= MAX_REPETITION)
                            .ok_or_else(|| ChemiaError::ParseError {
                                format: "abinit".to_string(),
                                path: String::new(),
                                reason: format!("invalid repetition '{}'", token),
                            })?;
                        values.extend(std::iter::repeat(value.to_string()).take(n));
                    }
                    Some((_, value)) => values.push(value.to_string()),
                    None => values.push(token.to_string()),
                }
            }
        }

        Ok(Self { variables })
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(&name.to_lowercase())
    }

    /// 原始记号
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.variables.get(&name.to_lowercase()).map(|v| v.as_slice())
    }

    pub fn get_floats(&self, name: &str) -> Result<Option<Vec<f64>>> {
        self.get(name)
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|t| parse_fortran_float(t).ok_or_else(|| bad_value(name, t)))
                    .collect()
            })
            .transpose()
    }

    pub fn get_ints(&self, name: &str) -> Result<Option<Vec<i64>>> {
        self.get(name)
            .map(|tokens| {
                tokens
                    .iter()
                    .map(|t| t.parse::<i64>().map_err(|_| bad_value(name, t)))
                    .collect()
            })
            .transpose()
    }

    /// 单个整数，缺省时返回 None；变量存在却没有值时报错
    pub fn get_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get_ints(name)? {
            None => Ok(None),
            Some(values) => values
                .first()
                .copied()
                .map(Some)
                .ok_or_else(|| ChemiaError::ParseError {
                    format: "abinit".to_string(),
                    path: String::new(),
                    reason: format!("variable '{}' has no value", name),
                }),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(|s| s.as_str())
    }
}

fn is_variable_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    !UNITS.contains(&token.to_lowercase().as_str())
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '?' || c == ':')
}

/// 接受 Fortran 的 `1.0d-3` 写法
fn parse_fortran_float(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['d', 'D'], "e").parse().ok())
}

fn bad_value(name: &str, token: &str) -> ChemiaError {
    ChemiaError::ParseError {
        format: "abinit".to_string(),
        path: String::new(),
        reason: format!("invalid value '{}' for variable '{}'", token, name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"
# NiO antiferromagnetic
natom 4  ntypat 2
typat 1 1 2 2
spinat 0 0 3   0 0 -3
       0 0 0   0 0 0    ! oxygens carry no moment
nsppol 1 nspden 2
usepawu 1
lpawu 2 -1
upawu 8.0 0 eV
ecut 1.5d1
dmatpawu 5*0.5 3*1.0
"#;

    #[test]
    fn test_parse_variables() {
        let input = AbinitInput::parse(INPUT).unwrap();

        assert!(input.has("natom"));
        assert!(input.has("SPINAT"));
        assert!(!input.has("nspinor"));
        assert_eq!(input.get_int("natom").unwrap(), Some(4));
        assert_eq!(input.get_ints("lpawu").unwrap(), Some(vec![2, -1]));
        assert_eq!(input.get_floats("spinat").unwrap().unwrap().len(), 12);
    }

    #[test]
    fn test_units_and_fortran_floats() {
        let input = AbinitInput::parse(INPUT).unwrap();
        assert_eq!(input.get_floats("upawu").unwrap(), Some(vec![8.0, 0.0]));
        assert_eq!(input.get_floats("ecut").unwrap(), Some(vec![15.0]));
    }

    #[test]
    fn test_repetition() {
        let input = AbinitInput::parse(INPUT).unwrap();
        let values = input.get_floats("dmatpawu").unwrap().unwrap();
        assert_eq!(values, vec![0.5, 0.5, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_value_before_name_is_error() {
        assert!(AbinitInput::parse("1 2 3\nnatom 2").is_err());
    }

    #[test]
    fn test_bad_integer() {
        let input = AbinitInput::parse("natom two").unwrap();
        // "two" 被识别为新的变量名
        assert_eq!(input.get_ints("natom").unwrap(), Some(vec![]));
        assert!(input.get_int("natom").is_err());
        let input = AbinitInput::parse("natom 2.5").unwrap();
        assert!(input.get_ints("natom").is_err());
    }

    #[test]
    fn test_spin_variable_without_value() {
        let input = AbinitInput::parse("nsppol two\nnatom 2").unwrap();
        assert!(input.get_int("nsppol").is_err());
        assert_eq!(input.get_int("nspinor").unwrap(), None);
    }

    #[test]
    fn test_huge_repetition_is_rejected() {
        assert!(AbinitInput::parse("dmatpawu 99999999999999999*0.5").is_err());
        assert!(AbinitInput::parse("dmatpawu 1048577*0.5").is_err());
        let input = AbinitInput::parse("dmatpawu 25*0.5").unwrap();
        assert_eq!(input.get("dmatpawu").map(|v| v.len()), Some(25));
    }
}
