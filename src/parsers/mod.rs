//! # 解析器模块
//!
//! 提供各种结构文件格式的读写。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, cell, xyz, cif

pub mod cell;
pub mod cif;
pub mod poscar;
pub mod xyz;

use crate::error::{ChemiaError, Result};
use crate::models::Structure;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 支持的结构文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Poscar,
    Cell,
    Xyz,
    Cif,
    Json,
}

impl StructureFormat {
    /// 从文件路径推断格式
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "cell" => Some(StructureFormat::Cell),
            "xyz" => Some(StructureFormat::Xyz),
            "cif" => Some(StructureFormat::Cif),
            "json" => Some(StructureFormat::Json),
            "vasp" | "poscar" => Some(StructureFormat::Poscar),
            _ => {
                // 可能是 POSCAR/CONTCAR (无扩展名)
                let name = path.file_name().and_then(|n| n.to_str())?;
                let upper = name.to_uppercase();
                (upper.starts_with("POSCAR") || upper.starts_with("CONTCAR"))
                    .then_some(StructureFormat::Poscar)
            }
        }
    }

    /// 该格式是否可以读取
    pub fn is_readable(&self) -> bool {
        !matches!(self, StructureFormat::Cif)
    }

    /// 由结构名生成输出文件名
    pub fn output_file_name(&self, stem: &str) -> PathBuf {
        match self {
            StructureFormat::Poscar => PathBuf::from(format!("POSCAR_{}", stem)),
            StructureFormat::Cell => PathBuf::from(format!("{}.cell", stem)),
            StructureFormat::Xyz => PathBuf::from(format!("{}.xyz", stem)),
            StructureFormat::Cif => PathBuf::from(format!("{}.cif", stem)),
            StructureFormat::Json => PathBuf::from(format!("{}.json", stem)),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureFormat::Poscar => write!(f, "poscar"),
            StructureFormat::Cell => write!(f, "cell"),
            StructureFormat::Xyz => write!(f, "xyz"),
            StructureFormat::Cif => write!(f, "cif"),
            StructureFormat::Json => write!(f, "json"),
        }
    }
}

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Structure> {
    if !path.exists() {
        return Err(ChemiaError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    match StructureFormat::from_path(path) {
        Some(StructureFormat::Poscar) => poscar::parse_poscar_file(path),
        Some(StructureFormat::Cell) => cell::parse_cell_file(path),
        Some(StructureFormat::Xyz) => xyz::parse_xyz_file(path),
        Some(StructureFormat::Json) => parse_json_file(path),
        Some(StructureFormat::Cif) => Err(ChemiaError::UnsupportedFormat(format!(
            "Reading CIF is not supported: {}",
            path.display()
        ))),
        None => Err(ChemiaError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        ))),
    }
}

/// 解析 JSON 结构文件（反序列化时完成校验）
pub fn parse_json_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| ChemiaError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut structure: Structure = serde_json::from_str(&content)?;
    if structure.name.is_empty() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            structure.name = stem.to_string();
        }
    }
    Ok(structure)
}

/// 序列化为目标格式字符串
pub fn to_format_string(structure: &Structure, format: StructureFormat) -> Result<String> {
    Ok(match format {
        StructureFormat::Poscar => poscar::to_poscar_string(structure),
        StructureFormat::Cell => cell::to_cell_string(structure),
        StructureFormat::Xyz => xyz::to_xyz_string(structure),
        StructureFormat::Cif => cif::to_cif_string(structure, None),
        StructureFormat::Json => serde_json::to_string_pretty(structure)?,
    })
}

/// 写出结构文件；`format` 为空时按路径推断
pub fn write_structure_file(
    structure: &Structure,
    path: &Path,
    format: Option<StructureFormat>,
) -> Result<()> {
    let format = format
        .or_else(|| StructureFormat::from_path(path))
        .ok_or_else(|| {
            ChemiaError::UnsupportedFormat(format!(
                "Cannot determine output format for: {}",
                path.display()
            ))
        })?;

    let content = to_format_string(structure, format)?;
    fs::write(path, content).map_err(|e| ChemiaError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!("wrote {} ({}, {} atoms)", path.display(), format, structure.natom());
    Ok(())
}
