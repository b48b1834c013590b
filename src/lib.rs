//! transd: TransD knowledge graph embeddings on candle.
//!
//! A knowledge graph is a set of (head, relation, tail) facts. TransD learns
//! a vector per entity and per relation such that, after projecting the
//! entities into the relation's space, `h⊥ + r ≈ t⊥` holds for true facts.
//!
//! # Key Idea
//!
//! Instead of one projection matrix per relation (TransR), each entity and
//! relation carries a second "projection vector". The mapping matrix for a
//! pair is their outer product plus the identity, so it is never
//! materialized:
//!
//! ```text
//! h⊥ = I h + (h_p · h) r_p
//! ```
//!
//! Parameters are candle [`Var`](candle_core::Var)s; losses stay on the
//! autograd graph so any `candle_nn` optimizer can train them.

pub mod batch;
pub mod config;
pub mod error;
pub mod loss;
pub mod model;
pub mod scoring;
pub mod tensor;

pub use batch::{Triple, TripleBatch};
pub use config::ModelConfig;
pub use error::{KgeError, Result};
pub use loss::pairwise_margin_loss;
pub use model::{KgeModel, TrainingStrategy, TransD};
pub use scoring::{dissimilarity, l2_normalize, rank_ascending, Norm};
pub use tensor::{default_device, glorot_normal};
