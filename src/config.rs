//! Model hyperparameters.
//!
//! A [`ModelConfig`] carries the knowledge graph statistics (entity and
//! relation counts) together with the embedding sizes and scoring options.
//! It can be built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "num_entities": 14951,
//!   "num_relations": 1345,
//!   "ent_hidden_size": 64,
//!   "rel_hidden_size": 32,
//!   "l1_flag": true,
//!   "margin": 1.0
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{KgeError, Result};

fn default_l1_flag() -> bool {
    true
}

fn default_margin() -> f64 {
    1.0
}

/// Configuration for a TransD model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Total number of entities (rows of the entity tables)
    pub num_entities: usize,
    /// Total number of relations (rows of the relation tables)
    pub num_relations: usize,
    /// Entity embedding size `d`
    pub ent_hidden_size: usize,
    /// Relation embedding size `k`; defaults to `ent_hidden_size`
    #[serde(default)]
    pub rel_hidden_size: Option<usize>,
    /// Use L1 (`true`) or squared L2 (`false`) dissimilarity
    #[serde(default = "default_l1_flag")]
    pub l1_flag: bool,
    /// Margin of the pairwise ranking loss
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Seed for parameter initialization; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ModelConfig {
    /// Create a config with `d == k == dim` and default scoring options.
    pub fn new(num_entities: usize, num_relations: usize, dim: usize) -> Self {
        Self {
            num_entities,
            num_relations,
            ent_hidden_size: dim,
            rel_hidden_size: None,
            l1_flag: default_l1_flag(),
            margin: default_margin(),
            seed: None,
        }
    }

    /// Set the relation embedding size `k`.
    pub fn with_rel_hidden_size(mut self, k: usize) -> Self {
        self.rel_hidden_size = Some(k);
        self
    }

    /// Select L1 (`true`) or squared L2 (`false`) dissimilarity.
    pub fn with_l1_flag(mut self, l1_flag: bool) -> Self {
        self.l1_flag = l1_flag;
        self
    }

    /// Set the pairwise loss margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Seed parameter initialization.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Entity embedding size `d`.
    pub fn d(&self) -> usize {
        self.ent_hidden_size
    }

    /// Relation embedding size `k`.
    pub fn k(&self) -> usize {
        self.rel_hidden_size.unwrap_or(self.ent_hidden_size)
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configs that cannot produce parameter tables.
    ///
    /// The margin is not checked: a NaN margin yields a NaN loss, which is
    /// the caller's to notice.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("num_entities", self.num_entities),
            ("num_relations", self.num_relations),
            ("ent_hidden_size", self.d()),
            ("rel_hidden_size", self.k()),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(KgeError::InvalidConfig(format!("{} must be positive", field)));
            }
        }
        Ok(())
    }
}
