//! # 终端输出
//!
//! 面向用户的结果行统一带一个彩色标签，如 `[OK]`、`[WARN]`。
//! 诊断信息走 `tracing`，不经过这里。
//!
//! ## 依赖关系
//! - 被 `commands/` 与 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};
use std::fmt::Display;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy)]
enum Tag {
    Ok,
    Err,
    Warn,
    Info,
    Done,
}

impl Tag {
    fn label(self) -> ColoredString {
        match self {
            Tag::Ok => "[OK]".green().bold(),
            Tag::Err => "[ERR]".red().bold(),
            Tag::Warn => "[WARN]".yellow().bold(),
            Tag::Info => "[*]".blue().bold(),
            Tag::Done => "[DONE]".green().bold(),
        }
    }
}

fn tagged(tag: Tag, msg: &str) {
    match tag {
        // 错误写到 stderr
        Tag::Err => eprintln!("{} {}", tag.label(), msg),
        _ => println!("{} {}", tag.label(), msg),
    }
}

fn rule() -> ColoredString {
    "─".repeat(RULE_WIDTH).dimmed()
}

pub fn print_success(msg: &str) {
    tagged(Tag::Ok, msg);
}

pub fn print_error(msg: &str) {
    tagged(Tag::Err, msg);
}

pub fn print_warning(msg: &str) {
    tagged(Tag::Warn, msg);
}

pub fn print_info(msg: &str) {
    tagged(Tag::Info, msg);
}

/// 批处理结束时的统计行
pub fn print_done(msg: &str) {
    tagged(Tag::Done, msg);
}

/// `[OK] 源文件 -> 目标文件`
pub fn print_conversion(from: &str, to: &str) {
    let arrow = format!("{} {}", from.dimmed(), "->".cyan());
    tagged(Tag::Ok, &format!("{} {}", arrow, to));
}

/// 缩进对齐的 "键: 值"
pub fn print_field(key: &str, value: impl Display) {
    println!("  {:<18} {}", format!("{}:", key).bold(), value);
}

pub fn print_header(title: &str) {
    println!("\n{}\n  {}\n{}\n", rule(), title.bold(), rule());
}

pub fn print_separator() {
    println!("{}", rule());
}
