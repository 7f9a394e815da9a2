//! # DFT+U 占据矩阵种群
//!
//! 同一结构的多个候选只在 `dmatpawu` 占据矩阵上不同。每个矩阵分解为
//! 整数占据 O、偏移 D 与转动 R：
//!
//! ```text
//! λ_j = O_j + D_j   (O_j = 0)
//! λ_j = O_j - D_j   (O_j = 1)
//! M   = R diag(λ) Rᵀ
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/dftu.rs` 使用
//! - 使用 `dftu/abinit.rs`
//! - 使用 `nalgebra` 做 QR 与对称本征分解，`rand` 生成随机候选

use super::abinit::AbinitInput;
use crate::error::{ChemiaError, Result};
use nalgebra::DMatrix;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 判定两个候选相同的距离阈值
pub const DUPLICATE_TOLERANCE: f64 = 1e-3;

/// 自旋设置，缺省值与 ABINIT 相同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpinConfig {
    pub nsppol: i64,
    pub nspinor: i64,
    pub nspden: i64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            nsppol: 1,
            nspinor: 1,
            nspden: 1,
        }
    }
}

impl SpinConfig {
    /// 每个 +U 原子在 dmatpawu 中的矩阵个数
    pub fn matrices_per_atom(&self) -> Result<usize> {
        match (self.nsppol, self.nspinor, self.nspden) {
            // 非磁性 / 反铁磁共线：只给自旋向上
            (1, 1, 1) | (1, 1, 2) => Ok(1),
            // 铁磁共线 / 非共线
            (2, 1, 2) | (1, 2, 4) | (1, 2, 1) => Ok(2),
            (a, b, c) => Err(ChemiaError::DftuError(format!(
                "unsupported spin setting nsppol={} nspinor={} nspden={}",
                a, b, c
            ))),
        }
    }

    fn from_input(input: &AbinitInput) -> Result<Self> {
        let nsppol = input.get_int("nsppol")?.unwrap_or(1);
        let nspinor = input.get_int("nspinor")?.unwrap_or(1);
        let nspden = input.get_int("nspden")?.unwrap_or(nsppol);
        Ok(Self {
            nsppol,
            nspinor,
            nspden,
        })
    }
}

/// 一个候选的分解参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationParams {
    /// 整数占据 (0/1)，每个矩阵 ndim 个
    #[serde(rename = "O")]
    pub occupations: Vec<Vec<u8>>,
    /// 本征值偏移
    #[serde(rename = "D")]
    pub deltas: Vec<Vec<f64>>,
    /// 转动矩阵，按行展开 (ndim × ndim)
    #[serde(rename = "R")]
    pub rotations: Vec<Vec<f64>>,
}

impl OccupationParams {
    pub fn nmatrices(&self) -> usize {
        self.occupations.len()
    }
}

/// DFT+U 搜索的设置
#[derive(Debug, Clone, Serialize)]
pub struct OrbitalDftu {
    natpawu: usize,
    lpawu: usize,
    spin: SpinConfig,
    nmatrices: usize,
    electrons: Vec<usize>,
    connections: Vec<i64>,
}

impl OrbitalDftu {
    /// `electrons[i]` 是第 i 个矩阵所在自旋通道的电子数，
    /// `connections` 相同标签的矩阵保持一致
    pub fn new(
        natpawu: usize,
        lpawu: usize,
        spin: SpinConfig,
        electrons: Vec<usize>,
        connections: Vec<i64>,
    ) -> Result<Self> {
        if natpawu == 0 {
            return Err(ChemiaError::DftuError(
                "no atoms carry a +U correction".to_string(),
            ));
        }
        if lpawu == 0 {
            return Err(ChemiaError::DftuError(
                "lpawu must be at least 1 (p orbitals)".to_string(),
            ));
        }

        let nmatrices = natpawu * spin.matrices_per_atom()?;
        let ndim = 2 * lpawu + 1;

        if electrons.len() != nmatrices {
            return Err(ChemiaError::DftuError(format!(
                "{} electron counts given but dmatpawu holds {} matrices",
                electrons.len(),
                nmatrices
            )));
        }
        if connections.len() != nmatrices {
            return Err(ChemiaError::DftuError(format!(
                "{} connections given but dmatpawu holds {} matrices",
                connections.len(),
                nmatrices
            )));
        }
        if let Some(&n) = electrons.iter().find(|&&n| n > ndim) {
            return Err(ChemiaError::DftuError(format!(
                "{} electrons do not fit in {} orbitals",
                n, ndim
            )));
        }

        Ok(Self {
            natpawu,
            lpawu,
            spin,
            nmatrices,
            electrons,
            connections,
        })
    }

    /// 从 ABINIT 输入读取 natpawu (spinat 非零行数)、lpawu 与自旋设置
    pub fn from_abinit_input(
        path: &Path,
        electrons: Vec<usize>,
        connections: Vec<i64>,
    ) -> Result<Self> {
        let input = AbinitInput::from_file(path)?;

        let lpawu = input
            .get_ints("lpawu")?
            .and_then(|v| v.into_iter().max())
            .ok_or_else(|| ChemiaError::DftuError("variable 'lpawu' not found".to_string()))?;
        let lpawu = usize::try_from(lpawu).map_err(|_| {
            ChemiaError::DftuError(format!("no correlated orbitals (max lpawu = {})", lpawu))
        })?;

        let spinat = input.get_floats("spinat")?.ok_or_else(|| {
            ChemiaError::DftuError(
                "variable 'spinat' not found, cannot determine natpawu".to_string(),
            )
        })?;
        if spinat.len() % 3 != 0 {
            return Err(ChemiaError::DftuError(format!(
                "spinat has {} values, not a multiple of 3",
                spinat.len()
            )));
        }
        let natpawu = spinat
            .chunks(3)
            .filter(|v| v.iter().map(|x| x * x).sum::<f64>() > 0.0)
            .count();

        let spin = SpinConfig::from_input(&input)?;
        tracing::info!(
            "{}: natpawu={} lpawu={} nsppol={} nspinor={} nspden={}",
            path.display(),
            natpawu,
            lpawu,
            spin.nsppol,
            spin.nspinor,
            spin.nspden
        );

        Self::new(natpawu, lpawu, spin, electrons, connections)
    }

    pub fn natpawu(&self) -> usize {
        self.natpawu
    }

    pub fn lpawu(&self) -> usize {
        self.lpawu
    }

    pub fn spin(&self) -> SpinConfig {
        self.spin
    }

    pub fn nmatrices(&self) -> usize {
        self.nmatrices
    }

    /// 矩阵维度：d 轨道 5，f 轨道 7
    pub fn ndim(&self) -> usize {
        2 * self.lpawu + 1
    }

    pub fn electrons(&self) -> &[usize] {
        &self.electrons
    }

    pub fn connections(&self) -> &[i64] {
        &self.connections
    }

    /// 生成一个随机候选
    pub fn random_params<R: Rng + ?Sized>(&self, rng: &mut R) -> OccupationParams {
        let ndim = self.ndim();
        let mut occupations: Vec<Vec<u8>> = Vec::with_capacity(self.nmatrices);
        let mut deltas: Vec<Vec<f64>> = Vec::with_capacity(self.nmatrices);
        let mut rotations: Vec<Vec<f64>> = Vec::with_capacity(self.nmatrices);

        for i in 0..self.nmatrices {
            let label = self.connections[i];
            let first = self.connections[..i].iter().position(|&c| c == label);

            match first {
                Some(j) => {
                    occupations.push(occupations[j].clone());
                    deltas.push(deltas[j].clone());
                    rotations.push(rotations[j].clone());
                }
                None => {
                    let mut occ = vec![0u8; ndim];
                    for k in rand::seq::index::sample(rng, ndim, self.electrons[i]) {
                        occ[k] = 1;
                    }
                    occupations.push(occ);
                    deltas.push(vec![0.0; ndim]);
                    rotations.push(to_row_major(&random_rotation(rng, ndim)));
                }
            }
        }

        OccupationParams {
            occupations,
            deltas,
            rotations,
        }
    }

    /// 候选 -> dmatpawu
    pub fn to_dmatpawu(&self, params: &OccupationParams) -> Result<Vec<f64>> {
        self.check_params(params)?;
        params_to_dmatpawu(params, self.ndim())
    }

    /// dmatpawu -> 候选
    pub fn from_dmatpawu(&self, dmatpawu: &[f64]) -> Result<OccupationParams> {
        let params = dmatpawu_to_params(dmatpawu, self.ndim())?;
        self.check_params(&params)?;
        Ok(params)
    }

    /// 两个候选之间的距离
    pub fn distance(&self, a: &OccupationParams, b: &OccupationParams) -> Result<f64> {
        let ma = self.to_dmatpawu(a)?;
        let mb = self.to_dmatpawu(b)?;
        Ok(ma
            .iter()
            .zip(mb.iter())
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt())
    }

    /// 将 `origin` 沿 `target` 方向移动；factor=0 不动，factor=1 到达 target
    pub fn move_towards(
        &self,
        origin: &OccupationParams,
        target: &OccupationParams,
        factor: f64,
    ) -> Result<OccupationParams> {
        let ma = self.to_dmatpawu(origin)?;
        let mb = self.to_dmatpawu(target)?;
        let moved: Vec<f64> = ma
            .iter()
            .zip(mb.iter())
            .map(|(x, y)| x + factor * (y - x))
            .collect();
        dmatpawu_to_params(&moved, self.ndim())
    }

    /// 找出重复候选：返回 (代表下标, 与之等价的下标列表)
    pub fn check_duplicates(
        &self,
        candidates: &[OccupationParams],
    ) -> Result<Vec<(usize, Vec<usize>)>> {
        let matrices = candidates
            .iter()
            .map(|c| self.to_dmatpawu(c))
            .collect::<Result<Vec<_>>>()?;

        let mut claimed = vec![false; candidates.len()];
        let mut groups = Vec::new();
        for i in 0..matrices.len() {
            if claimed[i] {
                continue;
            }
            let same: Vec<usize> = (i + 1..matrices.len())
                .filter(|&j| !claimed[j] && frobenius(&matrices[i], &matrices[j]) < DUPLICATE_TOLERANCE)
                .collect();
            for &j in &same {
                claimed[j] = true;
            }
            if !same.is_empty() {
                groups.push((i, same));
            }
        }
        Ok(groups)
    }

    fn check_params(&self, params: &OccupationParams) -> Result<()> {
        if params.nmatrices() != self.nmatrices {
            return Err(ChemiaError::DftuError(format!(
                "candidate has {} matrices, expected {}",
                params.nmatrices(),
                self.nmatrices
            )));
        }
        Ok(())
    }
}

impl fmt::Display for OrbitalDftu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " DFT+U occupation search")?;
        writeln!(f)?;
        writeln!(f, " natpawu:      {}", self.natpawu)?;
        writeln!(f, " lpawu:        {}", self.lpawu)?;
        writeln!(f, " ndim:         {}", self.ndim())?;
        writeln!(
            f,
            " spin:         nsppol={} nspinor={} nspden={}",
            self.spin.nsppol, self.spin.nspinor, self.spin.nspden
        )?;
        writeln!(f, " nmatrices:    {}", self.nmatrices)?;
        writeln!(f, " electrons:    {:?}", self.electrons)?;
        write!(f, " connections:  {:?}", self.connections)
    }
}

/// 由 O, D, R 重建 dmatpawu（按矩阵依次按行展开）
pub fn params_to_dmatpawu(params: &OccupationParams, ndim: usize) -> Result<Vec<f64>> {
    let n = params.nmatrices();
    if params.deltas.len() != n || params.rotations.len() != n {
        return Err(ChemiaError::DftuError(format!(
            "inconsistent parameters: {} occupations, {} deltas, {} rotations",
            n,
            params.deltas.len(),
            params.rotations.len()
        )));
    }

    let mut dmatpawu = Vec::with_capacity(n * ndim * ndim);
    for i in 0..n {
        let occ = &params.occupations[i];
        let delta = &params.deltas[i];
        let rot = &params.rotations[i];
        if occ.len() != ndim || delta.len() != ndim || rot.len() != ndim * ndim {
            return Err(ChemiaError::DftuError(format!(
                "matrix {} does not match ndim={}",
                i + 1,
                ndim
            )));
        }

        let eigenvalues: Vec<f64> = occ
            .iter()
            .zip(delta.iter())
            .map(|(&o, &d)| if o == 0 { d } else { o as f64 - d })
            .collect();

        let r = DMatrix::from_row_slice(ndim, ndim, rot);
        let lambda = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(eigenvalues));
        let m = &r * lambda * r.transpose();
        dmatpawu.extend(to_row_major(&m));
    }
    Ok(dmatpawu)
}

/// 将 dmatpawu 分解为 O, D, R；R 保证属于 SO(ndim)
pub fn dmatpawu_to_params(dmatpawu: &[f64], ndim: usize) -> Result<OccupationParams> {
    let size = ndim * ndim;
    if ndim == 0 || dmatpawu.is_empty() || dmatpawu.len() % size != 0 {
        return Err(ChemiaError::DftuError(format!(
            "dmatpawu has {} values, not a multiple of {}x{}",
            dmatpawu.len(),
            ndim,
            ndim
        )));
    }

    let mut params = OccupationParams {
        occupations: Vec::new(),
        deltas: Vec::new(),
        rotations: Vec::new(),
    };

    for chunk in dmatpawu.chunks(size) {
        let m = DMatrix::from_row_slice(ndim, ndim, chunk);
        let m = (&m + m.transpose()) * 0.5;
        let eigen = m.symmetric_eigen();

        // nalgebra 不排序，按本征值升序排列
        let mut order: Vec<usize> = (0..ndim).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let mut occupations = Vec::with_capacity(ndim);
        let mut deltas = Vec::with_capacity(ndim);
        let mut r = DMatrix::zeros(ndim, ndim);
        for (col, &k) in order.iter().enumerate() {
            let lambda = eigen.eigenvalues[k];
            let o = lambda.round().clamp(0.0, 1.0);
            occupations.push(o as u8);
            deltas.push((lambda - o).abs());
            r.set_column(col, &eigen.eigenvectors.column(k));
        }

        if r.determinant() < 0.0 {
            let mut first = r.column_mut(0);
            first *= -1.0;
        }

        params.occupations.push(occupations);
        params.deltas.push(deltas);
        params.rotations.push(to_row_major(&r));
    }

    Ok(params)
}

/// 随机 SO(n) 矩阵：随机矩阵 QR 分解的 Q，det < 0 时翻转第一列
fn random_rotation<R: Rng + ?Sized>(rng: &mut R, n: usize) -> DMatrix<f64> {
    let a = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    let mut q = a.qr().q();
    if q.determinant() < 0.0 {
        let mut first = q.column_mut(0);
        first *= -1.0;
    }
    q
}

fn to_row_major(m: &DMatrix<f64>) -> Vec<f64> {
    m.transpose().as_slice().to_vec()
}

fn frobenius(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn nio() -> OrbitalDftu {
        // 两个 Ni，d 轨道，铁磁：4 个矩阵
        OrbitalDftu::new(
            2,
            2,
            SpinConfig {
                nsppol: 2,
                nspinor: 1,
                nspden: 2,
            },
            vec![5, 3, 5, 3],
            vec![1, 2, 1, 2],
        )
        .unwrap()
    }

    fn rotation(params: &OccupationParams, i: usize, ndim: usize) -> DMatrix<f64> {
        DMatrix::from_row_slice(ndim, ndim, &params.rotations[i])
    }

    #[test]
    fn test_matrices_per_atom() {
        let cfg = |a, b, c| SpinConfig {
            nsppol: a,
            nspinor: b,
            nspden: c,
        };
        assert_eq!(cfg(1, 1, 1).matrices_per_atom().unwrap(), 1);
        assert_eq!(cfg(1, 1, 2).matrices_per_atom().unwrap(), 1);
        assert_eq!(cfg(2, 1, 2).matrices_per_atom().unwrap(), 2);
        assert_eq!(cfg(1, 2, 4).matrices_per_atom().unwrap(), 2);
        assert_eq!(cfg(1, 2, 1).matrices_per_atom().unwrap(), 2);
        assert!(cfg(2, 2, 4).matrices_per_atom().is_err());
    }

    #[test]
    fn test_new_validates_counts() {
        let spin = SpinConfig::default();
        assert!(OrbitalDftu::new(2, 2, spin, vec![3], vec![1, 2]).is_err());
        assert!(OrbitalDftu::new(2, 2, spin, vec![3, 3], vec![1]).is_err());
        assert!(OrbitalDftu::new(1, 2, spin, vec![6], vec![1]).is_err());

        let ok = OrbitalDftu::new(2, 3, spin, vec![3, 7], vec![1, 2]).unwrap();
        assert_eq!(ok.ndim(), 7);
        assert_eq!(ok.nmatrices(), 2);
    }

    #[test]
    fn test_random_params_respect_constraints() {
        let dftu = nio();
        let mut rng = StdRng::seed_from_u64(42);
        let params = dftu.random_params(&mut rng);

        assert_eq!(params.nmatrices(), 4);
        for (occ, &n) in params.occupations.iter().zip(dftu.electrons()) {
            assert_eq!(occ.iter().map(|&o| o as usize).sum::<usize>(), n);
        }
        // 相同连接标签的矩阵一致
        assert_eq!(params.occupations[0], params.occupations[2]);
        assert_eq!(params.rotations[1], params.rotations[3]);

        for i in 0..4 {
            let r = rotation(&params, i, 5);
            let identity = &r * r.transpose();
            assert!((identity - DMatrix::<f64>::identity(5, 5)).norm() < 1e-10);
            assert!((r.determinant() - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_dmatpawu_trace_equals_electrons() {
        let dftu = nio();
        let mut rng = StdRng::seed_from_u64(7);
        let dmat = dftu.to_dmatpawu(&dftu.random_params(&mut rng)).unwrap();

        assert_eq!(dmat.len(), 4 * 25);
        for (chunk, &n) in dmat.chunks(25).zip(dftu.electrons()) {
            let trace: f64 = (0..5).map(|k| chunk[k * 5 + k]).sum();
            assert!((trace - n as f64).abs() < 1e-10);
            // 对称
            assert!((chunk[1] - chunk[5]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_decomposition_reconstructs_matrix() {
        let dftu = nio();
        let mut rng = StdRng::seed_from_u64(3);
        let mut params = dftu.random_params(&mut rng);
        params.deltas[0] = vec![0.1, 0.0, 0.2, 0.05, 0.0];

        let dmat = dftu.to_dmatpawu(&params).unwrap();
        let back = dftu.from_dmatpawu(&dmat).unwrap();
        let again = dftu.to_dmatpawu(&back).unwrap();

        assert!(frobenius(&dmat, &again) < 1e-8);
        for i in 0..4 {
            assert!((rotation(&back, i, 5).determinant() - 1.0).abs() < 1e-8);
        }
        // 升序排列后 0 在前
        assert!(back.occupations[1].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_distance_and_duplicates() {
        let dftu = nio();
        let mut rng = StdRng::seed_from_u64(11);
        let a = dftu.random_params(&mut rng);
        let b = dftu.random_params(&mut rng);

        assert!(dftu.distance(&a, &a).unwrap() < 1e-12);
        assert!(dftu.distance(&a, &b).unwrap() > DUPLICATE_TOLERANCE);

        let decomposed = dftu.from_dmatpawu(&dftu.to_dmatpawu(&a).unwrap()).unwrap();
        let groups = dftu
            .check_duplicates(&[a.clone(), b.clone(), decomposed])
            .unwrap();
        assert_eq!(groups, vec![(0, vec![2])]);
    }

    #[test]
    fn test_move_towards_endpoints() {
        let dftu = nio();
        let mut rng = StdRng::seed_from_u64(5);
        let a = dftu.random_params(&mut rng);
        let b = dftu.random_params(&mut rng);

        let start = dftu.move_towards(&a, &b, 0.0).unwrap();
        let end = dftu.move_towards(&a, &b, 1.0).unwrap();
        assert!(dftu.distance(&start, &a).unwrap() < 1e-8);
        assert!(dftu.distance(&end, &b).unwrap() < 1e-8);

        let half = dftu.move_towards(&a, &b, 0.5).unwrap();
        let d_ab = dftu.distance(&a, &b).unwrap();
        assert!((dftu.distance(&a, &half).unwrap() - 0.5 * d_ab).abs() < 1e-8);
    }

    #[test]
    fn test_from_abinit_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abinit.in");
        std::fs::write(
            &path,
            "natom 4\nspinat 0 0 3 0 0 -3 0 0 0 0 0 0\nnsppol 1 nspden 2\nlpawu 2 -1\n",
        )
        .unwrap();

        let dftu = OrbitalDftu::from_abinit_input(&path, vec![5, 5], vec![1, 2]).unwrap();
        assert_eq!(dftu.natpawu(), 2);
        assert_eq!(dftu.lpawu(), 2);
        assert_eq!(dftu.nmatrices(), 2);
        assert_eq!(dftu.spin().nspden, 2);

        assert!(OrbitalDftu::from_abinit_input(&path, vec![5], vec![1]).is_err());
    }

    #[test]
    fn test_params_serialize_with_short_keys() {
        let dftu = OrbitalDftu::new(1, 1, SpinConfig::default(), vec![1], vec![0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let json = serde_json::to_string(&dftu.random_params(&mut rng)).unwrap();
        assert!(json.contains("\"O\""));
        assert!(json.contains("\"R\""));
    }
}
