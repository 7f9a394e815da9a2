//! # 统一错误处理模块
//!
//! 定义 chemia 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// chemia 统一错误类型
#[derive(Error, Debug)]
pub enum ChemiaError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 结构错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Unknown element symbol: '{0}'")]
    UnknownElement(String),

    #[error("Singular lattice (volume {volume:.3e} Å³)")]
    SingularLattice { volume: f64 },

    #[error("Atom index {index} out of range (structure has {natom} atoms)")]
    AtomIndexOutOfRange { index: usize, natom: usize },

    #[error("Invalid supercell size {size:?}: {reason}")]
    InvalidSupercell { size: [usize; 3], reason: String },

    // ─────────────────────────────────────────────────────────────
    // 对称性错误
    // ─────────────────────────────────────────────────────────────
    #[error("Symmetry search failed: {0}")]
    SymmetryError(String),

    // ─────────────────────────────────────────────────────────────
    // DFT+U 错误
    // ─────────────────────────────────────────────────────────────
    #[error("DFT+U setup error: {0}")]
    DftuError(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ChemiaError>;
