//! # info 命令实现
//!
//! 读取结构文件，按教程格式打印原子、周期性与晶格矢量，并给出化学式、
//! 晶格参数、体积与密度。
//!
//! ## 依赖关系
//! - 使用 `cli/info.rs` 定义的参数
//! - 使用 `parsers/`, `models/`
//! - 使用 `utils/output.rs`

use crate::cli::info::InfoArgs;
use crate::error::Result;
use crate::parsers;
use crate::utils::output;

/// 执行 info 命令
pub fn execute(args: InfoArgs) -> Result<()> {
    let structure = parsers::parse_structure_file(&args.file)?;

    output::print_header(&format!("Structure: {}", structure.name));
    println!("{}", structure);
    output::print_separator();

    output::print_field("Formula", structure.formula());
    output::print_field("Reduced formula", structure.reduced_formula());
    output::print_field("Atoms", structure.natom());

    if structure.is_crystal() {
        let (a, b, c, alpha, beta, gamma) = structure.lattice().parameters();
        output::print_field("a, b, c (Å)", format!("{:.4} {:.4} {:.4}", a, b, c));
        output::print_field(
            "α, β, γ (°)",
            format!("{:.3} {:.3} {:.3}", alpha, beta, gamma),
        );
        output::print_field("Volume (Å³)", format!("{:.4}", structure.volume()));
        output::print_field("Density (g/cm³)", format!("{:.4}", structure.density()));
    }

    if args.distances {
        println!();
        output::print_info("Interatomic distances (Å)");
        for (i, row) in structure.distance_matrix().iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|d| format!("{:8.4}", d)).collect();
            println!(" {:>4} {}", structure.symbols()[i], cells.join(" "));
        }
    }

    Ok(())
}
