//! TransD: translation with dynamic mapping matrices.
//!
//! [Ji et al. 2015](https://www.aclweb.org/anthology/P15-1067) give every
//! entity and relation two vectors: the embedding itself and a projection
//! vector. For a pair (entity e, relation r) the mapping matrix is built on
//! the fly instead of stored:
//!
//! ```text
//! M_re = r_p e_pᵀ + I^{k×d}
//! e⊥   = M_re e = I e + (e_p · e) r_p
//! ```
//!
//! so projecting costs one dot product and one axpy, with no k×d matrix per
//! relation as in TransR. Triples are then scored translationally,
//! `h⊥ + r ≈ t⊥`, with [`dissimilarity`](crate::scoring::dissimilarity).
//!
//! `I^{k×d}` is the rectangular identity: it keeps the first `k` components
//! of `e` when `d > k` and zero-pads `e` when `d < k`. With `d == k` the
//! projection reduces to `e + (e · e_p) r_p`.

use candle_core::{Device, Tensor, Var, D};
use indexmap::IndexMap;
use tracing::debug;

use super::{KgeModel, TrainingStrategy};
use crate::batch::TripleBatch;
use crate::config::ModelConfig;
use crate::error::{KgeError, Result};
use crate::scoring::{dissimilarity, Norm};
use crate::tensor::{glorot_normal, seeded_rng};

/// TransD parameter tables.
#[derive(Debug)]
pub struct TransD {
    config: ModelConfig,
    /// Entity embeddings: [num_entities, d]
    ent_embeddings: Var,
    /// Relation embeddings: [num_relations, k]
    rel_embeddings: Var,
    /// Entity projection vectors: [num_entities, d]
    ent_mappings: Var,
    /// Relation projection vectors: [num_relations, k]
    rel_mappings: Var,
    device: Device,
}

impl TransD {
    /// Allocate Glorot-normal tables for `config`.
    ///
    /// The four tables are drawn independently from one RNG, seeded from
    /// `config.seed` when present.
    pub fn new(config: &ModelConfig, device: &Device) -> Result<Self> {
        config.validate()?;
        let (n_e, n_r, d, k) = (config.num_entities, config.num_relations, config.d(), config.k());

        let mut rng = seeded_rng(config.seed);
        let ent_embeddings = Var::from_tensor(&glorot_normal(n_e, d, &mut rng, device)?)?;
        let rel_embeddings = Var::from_tensor(&glorot_normal(n_r, k, &mut rng, device)?)?;
        let ent_mappings = Var::from_tensor(&glorot_normal(n_e, d, &mut rng, device)?)?;
        let rel_mappings = Var::from_tensor(&glorot_normal(n_r, k, &mut rng, device)?)?;

        debug!(
            num_entities = n_e,
            num_relations = n_r,
            d,
            k,
            seed = ?config.seed,
            "initialized TransD parameters"
        );

        Ok(Self {
            config: config.clone(),
            ent_embeddings,
            rel_embeddings,
            ent_mappings,
            rel_mappings,
            device: device.clone(),
        })
    }

    /// Build a model around caller-supplied tables.
    ///
    /// Each table must have the shape `config` implies. The tables are copied
    /// into fresh variables unless they already are variables.
    pub fn from_tables(
        config: &ModelConfig,
        ent_embeddings: &Tensor,
        rel_embeddings: &Tensor,
        ent_mappings: &Tensor,
        rel_mappings: &Tensor,
    ) -> Result<Self> {
        config.validate()?;
        let (n_e, n_r, d, k) = (config.num_entities, config.num_relations, config.d(), config.k());

        check_table("ent_embeddings", ent_embeddings, [n_e, d])?;
        check_table("rel_embeddings", rel_embeddings, [n_r, k])?;
        check_table("ent_mappings", ent_mappings, [n_e, d])?;
        check_table("rel_mappings", rel_mappings, [n_r, k])?;
        for (table, tensor) in [
            ("rel_embeddings", rel_embeddings),
            ("ent_mappings", ent_mappings),
            ("rel_mappings", rel_mappings),
        ] {
            check_compatible(table, tensor, ent_embeddings)?;
        }

        debug!(num_entities = n_e, num_relations = n_r, d, k, "adopted TransD tables");

        Ok(Self {
            config: config.clone(),
            ent_embeddings: Var::from_tensor(ent_embeddings)?,
            rel_embeddings: Var::from_tensor(rel_embeddings)?,
            ent_mappings: Var::from_tensor(ent_mappings)?,
            rel_mappings: Var::from_tensor(rel_mappings)?,
            device: ent_embeddings.device().clone(),
        })
    }

    /// Dissimilarity penalty selected by `config.l1_flag`.
    pub fn norm(&self) -> Norm {
        Norm::from_l1_flag(self.config.l1_flag)
    }

    pub fn ent_embeddings(&self) -> &Var {
        &self.ent_embeddings
    }

    pub fn rel_embeddings(&self) -> &Var {
        &self.rel_embeddings
    }

    pub fn ent_mappings(&self) -> &Var {
        &self.ent_mappings
    }

    pub fn rel_mappings(&self) -> &Var {
        &self.rel_mappings
    }

    /// Map entity embeddings into relation space:
    /// `I^{k×d} e + (e · e_p) r_p`.
    ///
    /// `emb_e`, `emb_m`: [b, d], `proj_vec`: [b, k]; returns [b, k].
    pub fn projection(&self, emb_e: &Tensor, emb_m: &Tensor, proj_vec: &Tensor) -> Result<Tensor> {
        let k = proj_vec.dim(D::Minus1)?;
        // [b, 1]
        let dot = emb_e.mul(emb_m)?.sum_keepdim(D::Minus1)?;
        let identity = resize_last_dim(emb_e, k)?;
        Ok(identity.add(&proj_vec.broadcast_mul(&dot)?)?)
    }
}

impl KgeModel for TransD {
    fn name(&self) -> &'static str {
        "TransD"
    }

    fn training_strategy(&self) -> TrainingStrategy {
        TrainingStrategy::PairwiseBased
    }

    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn device(&self) -> &Device {
        &self.device
    }

    fn named_parameters(&self) -> IndexMap<&'static str, Var> {
        IndexMap::from([
            ("ent_embedding", self.ent_embeddings.clone()),
            ("rel_embedding", self.rel_embeddings.clone()),
            ("ent_mappings", self.ent_mappings.clone()),
            ("rel_mappings", self.rel_mappings.clone()),
        ])
    }

    fn embed(&self, batch: &TripleBatch) -> Result<(Tensor, Tensor, Tensor)> {
        let (h, r, t) = (batch.heads(), batch.relations(), batch.tails());

        let ent = self.ent_embeddings.as_tensor();
        let ent_m = self.ent_mappings.as_tensor();

        let emb_h = ent.index_select(h, 0)?;
        let emb_r = self.rel_embeddings.as_tensor().index_select(r, 0)?;
        let emb_t = ent.index_select(t, 0)?;

        let h_m = ent_m.index_select(h, 0)?;
        let r_m = self.rel_mappings.as_tensor().index_select(r, 0)?;
        let t_m = ent_m.index_select(t, 0)?;

        let emb_h = self.projection(&emb_h, &h_m, &r_m)?;
        let emb_t = self.projection(&emb_t, &t_m, &r_m)?;

        Ok((emb_h, emb_r, emb_t))
    }

    fn dissimilarity(&self, h: &Tensor, r: &Tensor, t: &Tensor) -> Result<Tensor> {
        dissimilarity(h, r, t, self.norm(), D::Minus1)
    }
}

fn check_table(table: &'static str, tensor: &Tensor, expected: [usize; 2]) -> Result<()> {
    if tensor.dims() != expected.as_slice() {
        return Err(KgeError::DimensionMismatch {
            table,
            expected: expected.to_vec(),
            got: tensor.dims().to_vec(),
        });
    }
    Ok(())
}

/// `tensor` must share dtype and device with `reference`.
fn check_compatible(table: &'static str, tensor: &Tensor, reference: &Tensor) -> Result<()> {
    if tensor.dtype() != reference.dtype() {
        return Err(KgeError::TableDType {
            table,
            expected: reference.dtype(),
            got: tensor.dtype(),
        });
    }
    if !tensor.device().same_device(reference.device()) {
        return Err(KgeError::TableDevice {
            table,
            expected: format!("{:?}", reference.device().location()),
            got: format!("{:?}", tensor.device().location()),
        });
    }
    Ok(())
}

/// Truncate or zero-pad the last dimension to `k`.
fn resize_last_dim(x: &Tensor, k: usize) -> Result<Tensor> {
    let last = x.rank() - 1;
    let d = x.dim(last)?;
    let resized = if d > k {
        x.narrow(last, 0, k)?
    } else if d < k {
        x.pad_with_zeros(last, 0, k - d)?
    } else {
        x.clone()
    };
    Ok(resized)
}
