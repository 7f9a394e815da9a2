//! # CIF 格式输出
//!
//! 以 P1 设置写出全部原子（不做对称性约化）。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::models::Structure;

/// 转换为 CIF 格式
///
/// `note` 非空时作为注释行写在文件头，如检测到的空间群。
pub fn to_cif_string(structure: &Structure, note: Option<&str>) -> String {
    let (a, b, c, alpha, beta, gamma) = structure.lattice().parameters();

    let block_name = if structure.name.is_empty() {
        structure.formula()
    } else {
        structure.name.replace(char::is_whitespace, "_")
    };

    let mut result = String::new();
    if let Some(note) = note {
        result.push_str(&format!("# {}\n", note));
    }
    result.push_str(&format!("data_{}\n", block_name));
    result.push_str(&format!(
        "_chemical_formula_sum             '{}'\n",
        structure.formula()
    ));
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n\n");

    result.push_str(&format!("_cell_length_a    {:.6}\n", a));
    result.push_str(&format!("_cell_length_b    {:.6}\n", b));
    result.push_str(&format!("_cell_length_c    {:.6}\n", c));
    result.push_str(&format!("_cell_angle_alpha {:.4}\n", alpha));
    result.push_str(&format!("_cell_angle_beta  {:.4}\n", beta));
    result.push_str(&format!("_cell_angle_gamma {:.4}\n", gamma));
    result.push_str(&format!("_cell_volume      {:.4}\n\n", structure.volume()));

    result.push_str("loop_\n");
    result.push_str("_symmetry_equiv_pos_as_xyz\n");
    result.push_str("  'x, y, z'\n\n");

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    for (i, (symbol, p)) in structure
        .symbols()
        .iter()
        .zip(structure.reduced_positions().iter())
        .enumerate()
    {
        result.push_str(&format!(
            "{}{} {} {:.10} {:.10} {:.10} 1.0\n",
            symbol,
            i + 1,
            symbol,
            p[0],
            p[1],
            p[2]
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lattice;

    #[test]
    fn test_cif_contains_cell_and_sites() {
        let s = Structure::from_reduced(
            vec!["Na", "Cl"],
            Lattice::cubic(5.64),
            vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]],
        )
        .unwrap()
        .with_name("rock salt");

        let cif = to_cif_string(&s, Some("space group Fm-3m (225)"));
        assert!(cif.starts_with("# space group Fm-3m (225)\ndata_rock_salt\n"));
        assert!(cif.contains("_cell_length_a    5.640000"));
        assert!(cif.contains("_cell_angle_gamma 90.0000"));
        assert!(cif.contains("Cl2 Cl 0.5000000000 0.5000000000 0.5000000000 1.0"));
    }
}
