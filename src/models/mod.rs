//! # 数据模型模块
//!
//! 定义统一的晶格、元素与晶体结构数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `symmetry/` 和 `commands/` 使用
//! - 子模块: lattice, elements, structure, prototypes

pub mod elements;
pub mod lattice;
pub mod prototypes;
pub mod structure;

pub use lattice::Lattice;
pub use prototypes::{Prototype, PrototypeParams};
pub use structure::Structure;
