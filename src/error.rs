//! Error types for transd.

use candle_core::DType;
use thiserror::Error;

/// The main error type for transd operations.
#[derive(Debug, Error)]
pub enum KgeError {
    /// Candle tensor operation failed (includes out-of-range ids)
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Configuration rejected before any allocation
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config file could not be parsed
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// Config file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter table does not have the shape the config implies
    #[error("dimension mismatch in {table}: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        table: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A parameter table has a different dtype from the entity embeddings
    #[error("dtype mismatch in {table}: expected {expected:?}, got {got:?}")]
    TableDType {
        table: &'static str,
        expected: DType,
        got: DType,
    },

    /// A parameter table lives on a different device from the entity embeddings
    #[error("device mismatch in {table}: expected {expected}, got {got}")]
    TableDevice {
        table: &'static str,
        expected: String,
        got: String,
    },

    /// Shape mismatch between scoring inputs
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// Id batches that should line up have different lengths
    #[error("batch length mismatch: {what} has {got} entries, expected {expected}")]
    BatchLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// An operation that averages over the batch was given no triples
    #[error("empty batch: {what} has no triples")]
    EmptyBatch { what: &'static str },
}

/// Result type for transd operations.
pub type Result<T> = std::result::Result<T, KgeError>;
