//! Translational dissimilarity and ranking.
//!
//! Every model in the Trans* family scores a triple by how far the
//! translated head lands from the tail:
//!
//! ```text
//! score(h, r, t) = Σ_i |ĥ_i + r̂_i - t̂_i|      (L1)
//!                = Σ_i (ĥ_i + r̂_i - t̂_i)²     (L2)
//! ```
//!
//! where `x̂ = x / ||x||₂` along the reduction axis. Normalizing first makes
//! the score independent of vector length, so only direction is learned
//! through this function. Lower scores mean more plausible triples.

use candle_core::{shape::Dim, DType, Device, Tensor};
use serde::{Deserialize, Serialize};

use crate::error::{KgeError, Result};

/// Floor on the squared norm before the reciprocal square root.
pub const L2_EPSILON: f64 = 1e-12;

/// Elementwise penalty applied to `ĥ + r̂ - t̂` before summing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Norm {
    /// Absolute value
    L1,
    /// Square
    L2,
}

impl Norm {
    /// `true` selects L1, `false` selects (squared) L2.
    pub fn from_l1_flag(l1_flag: bool) -> Self {
        if l1_flag {
            Norm::L1
        } else {
            Norm::L2
        }
    }
}

/// Scale each vector along `axis` to unit L2 length.
///
/// `x / sqrt(max(Σ x², ε))`, so an all-zero vector stays zero instead of
/// producing NaN.
pub fn l2_normalize<A: Dim + Copy>(x: &Tensor, axis: A) -> Result<Tensor> {
    let sq_norm = x.sqr()?.sum_keepdim(axis)?;
    let inv_norm = sq_norm.maximum(L2_EPSILON)?.sqrt()?.recip()?;
    Ok(x.broadcast_mul(&inv_norm)?)
}

/// Score (head, relation, tail) embeddings, reducing along `axis`.
///
/// All three inputs must share one shape; the result drops `axis`.
pub fn dissimilarity<A: Dim + Copy>(h: &Tensor, r: &Tensor, t: &Tensor, norm: Norm, axis: A) -> Result<Tensor> {
    for other in [r, t] {
        if other.dims() != h.dims() {
            return Err(KgeError::ShapeMismatch {
                expected: h.dims().to_vec(),
                got: other.dims().to_vec(),
            });
        }
    }

    let norm_h = l2_normalize(h, axis)?;
    let norm_r = l2_normalize(r, axis)?;
    let norm_t = l2_normalize(t, axis)?;

    let diff = norm_h.add(&norm_r)?.sub(&norm_t)?;
    let penalty = match norm {
        Norm::L1 => diff.abs()?,
        Norm::L2 => diff.sqr()?,
    };

    Ok(penalty.sum(axis)?)
}

/// Indices of the `topk` lowest scores, best first.
///
/// `None` ranks every candidate; a `topk` past the candidate count is
/// clamped. Ties keep candle's sort order.
///
/// The sort always runs on the CPU, since GPU sort kernels cap the row
/// length below full entity sweeps. The indices come back on the device of
/// `scores`.
pub fn rank_ascending(scores: &Tensor, topk: Option<usize>) -> Result<Tensor> {
    let n = scores.dims1()?;
    let k = topk.map_or(n, |k| k.min(n));
    if k == 0 {
        return Ok(Tensor::zeros(0, DType::U32, scores.device())?);
    }

    let host = scores.to_device(&Device::Cpu)?.contiguous()?;
    let order = host.arg_sort_last_dim(true)?.narrow(0, 0, k)?;
    Ok(order.to_device(scores.device())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{Device, D};

    fn t2(rows: &[[f32; 2]]) -> Tensor {
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        Tensor::from_vec(data, (rows.len(), 2), &Device::Cpu).unwrap()
    }

    #[test]
    fn test_l2_normalize_rows() {
        let x = t2(&[[3.0, 4.0], [0.0, 2.0]]);
        let n = l2_normalize(&x, D::Minus1).unwrap();
        let rows: Vec<Vec<f32>> = n.to_vec2().unwrap();
        assert!((rows[0][0] - 0.6).abs() < 1e-6);
        assert!((rows[0][1] - 0.8).abs() < 1e-6);
        assert!((rows[1][1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector_stays_zero() {
        let x = t2(&[[0.0, 0.0]]);
        let rows: Vec<Vec<f32>> = l2_normalize(&x, 1usize).unwrap().to_vec2().unwrap();
        assert_eq!(rows[0], vec![0.0, 0.0]);
    }

    #[test]
    fn test_dissimilarity_hand_computed() {
        // ĥ = (1, 0), r̂ = (0, 1), t̂ = (1/√2, 1/√2)
        let h = t2(&[[2.0, 0.0]]);
        let r = t2(&[[0.0, 5.0]]);
        let t = t2(&[[1.0, 1.0]]);
        let c = 1.0 - std::f32::consts::FRAC_1_SQRT_2;

        let l1: Vec<f32> = dissimilarity(&h, &r, &t, Norm::L1, D::Minus1).unwrap().to_vec1().unwrap();
        let l2: Vec<f32> = dissimilarity(&h, &r, &t, Norm::L2, D::Minus1).unwrap().to_vec1().unwrap();
        assert!((l1[0] - 2.0 * c).abs() < 1e-5, "l1 = {}", l1[0]);
        assert!((l2[0] - 2.0 * c * c).abs() < 1e-5, "l2 = {}", l2[0]);
    }

    #[test]
    fn test_dissimilarity_along_first_axis() {
        // Columns are the vectors when reducing over axis 0.
        let h = t2(&[[1.0, 0.0], [0.0, 1.0]]);
        let r = t2(&[[0.0, 0.0], [0.0, 0.0]]);
        let by_rows = dissimilarity(&h, &r, &h, Norm::L1, 0usize).unwrap();
        assert_eq!(by_rows.dims(), &[2]);
        assert_eq!(by_rows.to_vec1::<f32>().unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_dissimilarity_shape_mismatch() {
        let h = t2(&[[1.0, 0.0]]);
        let r = Tensor::new(&[[1.0f32, 0.0, 0.0]], &Device::Cpu).unwrap();
        let err = dissimilarity(&h, &r, &h, Norm::L1, D::Minus1).unwrap_err();
        assert!(matches!(err, KgeError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rank_ascending() {
        let scores = Tensor::new(&[0.5f32, 0.1, 0.9, 0.3], &Device::Cpu).unwrap();
        let all: Vec<u32> = rank_ascending(&scores, None).unwrap().to_vec1().unwrap();
        assert_eq!(all, vec![1, 3, 0, 2]);

        let top2: Vec<u32> = rank_ascending(&scores, Some(2)).unwrap().to_vec1().unwrap();
        assert_eq!(top2, vec![1, 3]);

        let clamped: Vec<u32> = rank_ascending(&scores, Some(10)).unwrap().to_vec1().unwrap();
        assert_eq!(clamped.len(), 4);
    }

    #[test]
    fn test_rank_ascending_empty() {
        let scores = Tensor::zeros(0, DType::F32, &Device::Cpu).unwrap();
        let rank = rank_ascending(&scores, None).unwrap();
        assert_eq!(rank.dims(), &[0]);
        assert_eq!(rank.dtype(), DType::U32);
    }

    #[test]
    fn test_rank_ascending_topk_zero() {
        let scores = Tensor::new(&[0.5f32, 0.1], &Device::Cpu).unwrap();
        let rank: Vec<u32> = rank_ascending(&scores, Some(0)).unwrap().to_vec1().unwrap();
        assert!(rank.is_empty());
    }

    #[test]
    fn test_rank_ascending_keeps_input_device() {
        let scores = Tensor::new(&[0.2f32, 0.1], &Device::Cpu).unwrap();
        let rank = rank_ascending(&scores, None).unwrap();
        assert!(rank.device().same_device(scores.device()));
    }

    #[test]
    fn test_norm_from_flag() {
        assert_eq!(Norm::from_l1_flag(true), Norm::L1);
        assert_eq!(Norm::from_l1_flag(false), Norm::L2);
    }
}
