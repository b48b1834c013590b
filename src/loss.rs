//! Pairwise margin-ranking loss.

use candle_core::Tensor;

use crate::error::{KgeError, Result};

/// mean(max(0, margin + pos - neg)) over matched score vectors.
///
/// The result is a scalar tensor still attached to the autograd graph of
/// both inputs. It is zero exactly when every negative scores at least
/// `margin` above its positive.
pub fn pairwise_margin_loss(pos_score: &Tensor, neg_score: &Tensor, margin: f64) -> Result<Tensor> {
    if pos_score.dims() != neg_score.dims() {
        return Err(KgeError::ShapeMismatch {
            expected: pos_score.dims().to_vec(),
            got: neg_score.dims().to_vec(),
        });
    }

    let hinge = pos_score.sub(neg_score)?.affine(1.0, margin)?.relu()?;
    Ok(hinge.mean_all()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn scores(v: &[f32]) -> Tensor {
        Tensor::new(v, &Device::Cpu).unwrap()
    }

    fn loss(pos: &[f32], neg: &[f32], margin: f64) -> f32 {
        pairwise_margin_loss(&scores(pos), &scores(neg), margin)
            .unwrap()
            .to_scalar()
            .unwrap()
    }

    #[test]
    fn test_zero_when_margin_satisfied() {
        assert_eq!(loss(&[0.1, 0.5], &[1.5, 2.0], 1.0), 0.0);
        // Exactly on the margin still counts as satisfied.
        assert_eq!(loss(&[0.0], &[1.0], 1.0), 0.0);
    }

    #[test]
    fn test_positive_when_any_violates() {
        // Second pair violates by 0.5: mean(0, 0.5) = 0.25
        let l = loss(&[0.1, 0.5], &[1.5, 1.0], 1.0);
        assert!((l - 0.25).abs() < 1e-6, "loss = {}", l);
    }

    #[test]
    fn test_margin_scales_penalty() {
        let l = loss(&[1.0], &[1.0], 2.0);
        assert!((l - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_scores_rejected() {
        let err = pairwise_margin_loss(&scores(&[0.0, 1.0]), &scores(&[0.0]), 1.0).unwrap_err();
        assert!(matches!(err, KgeError::ShapeMismatch { .. }));
    }
}
