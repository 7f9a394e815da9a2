//! # chemia 命令行入口
//!
//! ## 子命令
//! - `info`      - 打印结构
//! - `build`     - 按原型构造结构
//! - `symmetry`  - 空间群分析
//! - `supercell` - 构造超胞
//! - `convert`   - 批量格式转换
//! - `dftu`      - DFT+U 占据矩阵辅助
//!
//! ## 日志
//! `CHEMIA_LOG` 环境变量（EnvFilter 语法）优先，否则由 `-v` 次数决定级别。

use chemia::cli::Cli;
use chemia::{commands, utils};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "chemia=debug",
        _ => "chemia=trace",
    };
    let filter = EnvFilter::try_from_env("CHEMIA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
