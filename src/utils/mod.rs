//! # 工具函数模块
//!
//! 提供美化输出与进度条。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `batch/` 使用
//! - 子模块: output, progress

pub mod output;
pub mod progress;
