//! # 晶格模型
//!
//! 三个行向量 a, b, c 表示的周期晶格，以及分数坐标与笛卡尔坐标的互相转换。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs`, `parsers/`, `symmetry/` 使用
//! - 无外部模块依赖

use crate::error::{ChemiaError, Result};
use serde::{Deserialize, Serialize};

/// 行列式小于该值时认为晶格奇异
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// 晶格参数表示
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let cos_gamma = gamma.to_radians().cos();
        let sin_gamma = gamma.to_radians().sin();

        let a_vec = [a, 0.0, 0.0];
        let b_vec = [b * cos_gamma, b * sin_gamma, 0.0];

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).max(0.0).sqrt();

        Lattice {
            matrix: [a_vec, b_vec, [c1, c2, c3]],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 简单立方晶格
    pub fn cubic(a: f64) -> Self {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    /// 晶格向量长度 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        [
            norm(&self.matrix[0]),
            norm(&self.matrix[1]),
            norm(&self.matrix[2]),
        ]
    }

    /// 晶格夹角 (alpha, beta, gamma)，单位：度
    pub fn angles(&self) -> [f64; 3] {
        let [a, b, c] = self.lengths();
        let [a_vec, b_vec, c_vec] = self.matrix;

        let angle = |u: &[f64; 3], v: &[f64; 3], lu: f64, lv: f64| {
            (dot(u, v) / (lu * lv)).clamp(-1.0, 1.0).acos().to_degrees()
        };

        [
            angle(&b_vec, &c_vec, b, c),
            angle(&a_vec, &c_vec, a, c),
            angle(&a_vec, &b_vec, a, b),
        ]
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a, b, c] = self.lengths();
        let [alpha, beta, gamma] = self.angles();
        (a, b, c, alpha, beta, gamma)
    }

    /// 计算晶格体积（带符号的行列式）
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(&a, &cross(&b, &c))
    }

    /// 度规张量 G = L Lᵀ
    pub fn metric(&self) -> [[f64; 3]; 3] {
        let mut g = [[0.0; 3]; 3];
        for (i, row) in g.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = dot(&self.matrix[i], &self.matrix[j]);
            }
        }
        g
    }

    /// 晶格矩阵的逆
    pub fn inverse(&self) -> Result<[[f64; 3]; 3]> {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < SINGULAR_TOLERANCE {
            return Err(ChemiaError::SingularLattice { volume: det });
        }

        Ok([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ])
    }

    /// 分数坐标转笛卡尔坐标: r = f · L
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标: f = r · L⁻¹
    pub fn to_fractional(&self, cart: [f64; 3]) -> Result<[f64; 3]> {
        let inv = self.inverse()?;
        Ok([
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ])
    }

    /// 倒易晶格（不含 2π 因子），行向量 a*, b*, c*
    pub fn reciprocal(&self) -> Result<Lattice> {
        let inv = self.inverse()?;
        // 倒易基矢是 L⁻¹ 的列
        Ok(Lattice::from_vectors([
            [inv[0][0], inv[1][0], inv[2][0]],
            [inv[0][1], inv[1][1], inv[2][1]],
            [inv[0][2], inv[1][2], inv[2][2]],
        ]))
    }

    /// 按整数倍缩放每个晶格向量（超胞晶格）
    pub fn scaled(&self, factors: [usize; 3]) -> Lattice {
        let mut matrix = self.matrix;
        for (row, &n) in matrix.iter_mut().zip(factors.iter()) {
            for value in row.iter_mut() {
                *value *= n as f64;
            }
        }
        Lattice { matrix }
    }
}

pub(crate) fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_from_parameters_cubic() {
        let lattice = Lattice::from_parameters(5.0, 5.0, 5.0, 90.0, 90.0, 90.0);
        let (a, b, c, alpha, beta, gamma) = lattice.parameters();

        assert!((a - 5.0).abs() < 1e-6);
        assert!((b - 5.0).abs() < 1e-6);
        assert!((c - 5.0).abs() < 1e-6);
        assert!((alpha - 90.0).abs() < 1e-6);
        assert!((beta - 90.0).abs() < 1e-6);
        assert!((gamma - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_volume_cubic() {
        let lattice = Lattice::cubic(5.0);
        // 5^3 = 125
        assert!((lattice.volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_lattice_hexagonal() {
        let lattice = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0);
        let (a, b, c, _, _, gamma) = lattice.parameters();

        assert!((a - 3.0).abs() < 0.01);
        assert!((b - 3.0).abs() < 0.01);
        assert!((c - 5.0).abs() < 0.01);
        assert!((gamma - 120.0).abs() < 0.01);
    }

    #[test]
    fn test_fractional_cartesian_inverse() {
        let lattice = Lattice::from_parameters(4.1, 5.3, 6.2, 82.0, 97.0, 103.0);
        let frac = [0.125, 0.5, 0.875];
        let cart = lattice.to_cartesian(frac);
        let back = lattice.to_fractional(cart).unwrap();

        for i in 0..3 {
            assert!((back[i] - frac[i]).abs() < 1e-10);
        }
    }

    #[test]
    fn test_fcc_primitive_volume() {
        // 面心立方原胞体积为立方晶胞的 1/4
        let a = 4.0;
        let lattice = Lattice::from_vectors([
            [0.0, a / 2.0, a / 2.0],
            [a / 2.0, 0.0, a / 2.0],
            [a / 2.0, a / 2.0, 0.0],
        ]);
        assert!((lattice.volume().abs() - a.powi(3) / 4.0).abs() < 1e-10);

        let (_, _, _, alpha, beta, gamma) = lattice.parameters();
        assert!((alpha - 60.0).abs() < 1e-8);
        assert!((beta - 60.0).abs() < 1e-8);
        assert!((gamma - 60.0).abs() < 1e-8);
    }

    #[test]
    fn test_singular_lattice_is_rejected() {
        let lattice = Lattice::from_vectors([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert!(matches!(
            lattice.inverse(),
            Err(ChemiaError::SingularLattice { .. })
        ));
    }

    #[test]
    fn test_reciprocal_is_dual_basis() {
        let lattice = Lattice::from_parameters(3.0, 4.0, 5.0, 80.0, 95.0, 110.0);
        let recip = lattice.reciprocal().unwrap();

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((dot(&lattice.matrix[i], &recip.matrix[j]) - expected).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_metric_diagonal_is_squared_lengths() {
        let lattice = Lattice::from_parameters(3.0, 4.0, 5.0, 90.0, 90.0, 120.0);
        let g = lattice.metric();
        assert!((g[0][0] - 9.0).abs() < 1e-10);
        assert!((g[1][1] - 16.0).abs() < 1e-10);
        assert!((g[2][2] - 25.0).abs() < 1e-10);
    }

    #[test]
    fn test_scaled_lattice() {
        let lattice = Lattice::cubic(2.0).scaled([2, 3, 1]);
        let [a, b, c] = lattice.lengths();
        assert!((a - 4.0).abs() < 1e-12);
        assert!((b - 6.0).abs() < 1e-12);
        assert!((c - 2.0).abs() < 1e-12);
    }
}
