//! Knowledge graph embedding models.
//!
//! A model owns its parameter tables as candle [`Var`]s and exposes the
//! differentiable pieces an external trainer needs: `embed`,
//! `dissimilarity`, `get_loss` and `predict_rank`. Optimization happens
//! outside: hand [`KgeModel::parameters`] to any `candle_nn` optimizer and
//! call `backward_step` on the loss.
//!
//! ```no_run
//! use candle_core::Device;
//! use transd::{KgeModel, ModelConfig, TransD, Triple, TripleBatch};
//!
//! let config = ModelConfig::new(3, 1, 16).with_seed(42);
//! let model = TransD::new(&config, &Device::Cpu)?;
//!
//! let pos = TripleBatch::from_triples(&[Triple::new(0, 0, 1)], &Device::Cpu)?;
//! let neg = TripleBatch::from_triples(&[Triple::new(0, 0, 2)], &Device::Cpu)?;
//! let loss = model.get_loss(&pos, &neg)?;
//! # Ok::<(), transd::KgeError>(())
//! ```

mod transd;

pub use self::transd::TransD;

use candle_core::{Device, Tensor, Var};
use indexmap::IndexMap;
use tracing::trace;

use crate::batch::TripleBatch;
use crate::config::ModelConfig;
use crate::error::{KgeError, Result};
use crate::loss::pairwise_margin_loss;
use crate::scoring::rank_ascending;

/// How an external trainer should feed a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStrategy {
    /// Positive batch paired with a corrupted negative batch
    PairwiseBased,
    /// Labelled triples scored one at a time
    PointwiseBased,
    /// (h, r) against all tails at once
    ProjectionBased,
}

/// Capability contract for one embedding algorithm.
pub trait KgeModel {
    /// Model name, e.g. "TransD".
    fn name(&self) -> &'static str;

    fn training_strategy(&self) -> TrainingStrategy;

    fn config(&self) -> &ModelConfig;

    fn device(&self) -> &Device;

    /// Learnable tables keyed by name, in definition order.
    fn named_parameters(&self) -> IndexMap<&'static str, Var>;

    /// Learnable tables for an optimizer.
    fn parameters(&self) -> Vec<Var> {
        self.named_parameters().into_values().collect()
    }

    /// Look up (and transform) the embeddings of a batch.
    ///
    /// Returns (head, relation, tail), each `[batch, dim]`.
    fn embed(&self, batch: &TripleBatch) -> Result<(Tensor, Tensor, Tensor)>;

    /// Per-example distance of embedded triples; lower is more plausible.
    fn dissimilarity(&self, h: &Tensor, r: &Tensor, t: &Tensor) -> Result<Tensor>;

    /// `embed` followed by `dissimilarity`.
    fn score(&self, batch: &TripleBatch) -> Result<Tensor> {
        let (h, r, t) = self.embed(batch)?;
        self.dissimilarity(&h, &r, &t)
    }

    /// Pairwise margin loss of a positive batch against its negatives.
    ///
    /// Both batches must be non-empty and of equal length.
    fn get_loss(&self, pos: &TripleBatch, neg: &TripleBatch) -> Result<Tensor> {
        if pos.is_empty() {
            return Err(KgeError::EmptyBatch { what: "positive batch" });
        }
        if neg.len() != pos.len() {
            return Err(KgeError::BatchLength {
                what: "negative batch",
                expected: pos.len(),
                got: neg.len(),
            });
        }

        let pos_score = self.score(pos)?;
        let neg_score = self.score(neg)?;
        pairwise_margin_loss(&pos_score, &neg_score, self.config().margin)
    }

    /// Candidate indices of the `topk` best (lowest) scores in the batch.
    ///
    /// `None` returns the full ranking.
    fn predict_rank(&self, batch: &TripleBatch, topk: Option<usize>) -> Result<Tensor> {
        trace!(model = self.name(), candidates = batch.len(), ?topk, "ranking");
        let scores = self.score(batch)?.detach();
        rank_ascending(&scores, topk)
    }

    /// Rank every entity as the tail of (head, relation, ?).
    fn predict_tail_rank(&self, head: u32, relation: u32, topk: Option<usize>) -> Result<Tensor> {
        let batch = TripleBatch::tail_sweep(head, relation, self.config().num_entities, self.device())?;
        self.predict_rank(&batch, topk)
    }

    /// Rank every entity as the head of (?, relation, tail).
    fn predict_head_rank(&self, relation: u32, tail: u32, topk: Option<usize>) -> Result<Tensor> {
        let batch = TripleBatch::head_sweep(relation, tail, self.config().num_entities, self.device())?;
        self.predict_rank(&batch, topk)
    }
}
