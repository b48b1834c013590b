//! Batches of (head, relation, tail) id triples.
//!
//! The model never stores triples. Callers hand it a [`TripleBatch`], three
//! rank-1 u32 id tensors of equal length, built from whatever data pipeline
//! sits outside this crate.

use candle_core::{Device, Tensor};

use crate::error::{KgeError, Result};

/// A single (head, relation, tail) fact as table row ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triple {
    pub head: u32,
    pub relation: u32,
    pub tail: u32,
}

impl Triple {
    pub fn new(head: u32, relation: u32, tail: u32) -> Self {
        Self { head, relation, tail }
    }
}

impl From<(u32, u32, u32)> for Triple {
    fn from((head, relation, tail): (u32, u32, u32)) -> Self {
        Self::new(head, relation, tail)
    }
}

/// Column-wise id tensors for a batch of triples.
#[derive(Debug, Clone)]
pub struct TripleBatch {
    heads: Tensor,
    relations: Tensor,
    tails: Tensor,
}

impl TripleBatch {
    /// Wrap existing id tensors. Each must be rank 1 and all three the same
    /// length.
    pub fn new(heads: Tensor, relations: Tensor, tails: Tensor) -> Result<Self> {
        let n = heads.dims1()?;
        for (what, ids) in [("relations", &relations), ("tails", &tails)] {
            let got = ids.dims1()?;
            if got != n {
                return Err(KgeError::BatchLength { what, expected: n, got });
            }
        }
        Ok(Self { heads, relations, tails })
    }

    /// Build a batch from three id columns.
    pub fn from_ids(heads: &[u32], relations: &[u32], tails: &[u32], device: &Device) -> Result<Self> {
        Self::new(
            Tensor::new(heads, device)?,
            Tensor::new(relations, device)?,
            Tensor::new(tails, device)?,
        )
    }

    /// Build a batch from a slice of triples.
    pub fn from_triples(triples: &[Triple], device: &Device) -> Result<Self> {
        let heads: Vec<u32> = triples.iter().map(|t| t.head).collect();
        let relations: Vec<u32> = triples.iter().map(|t| t.relation).collect();
        let tails: Vec<u32> = triples.iter().map(|t| t.tail).collect();
        Self::from_ids(&heads, &relations, &tails, device)
    }

    /// (head, relation, e) for every entity e, in id order.
    pub fn tail_sweep(head: u32, relation: u32, num_entities: usize, device: &Device) -> Result<Self> {
        let candidates = Tensor::arange(0u32, num_entities as u32, device)?;
        Self::new(
            Tensor::new(vec![head; num_entities], device)?,
            Tensor::new(vec![relation; num_entities], device)?,
            candidates,
        )
    }

    /// (e, relation, tail) for every entity e, in id order.
    pub fn head_sweep(relation: u32, tail: u32, num_entities: usize, device: &Device) -> Result<Self> {
        let candidates = Tensor::arange(0u32, num_entities as u32, device)?;
        Self::new(
            candidates,
            Tensor::new(vec![relation; num_entities], device)?,
            Tensor::new(vec![tail; num_entities], device)?,
        )
    }

    /// Number of triples in the batch.
    pub fn len(&self) -> usize {
        self.heads.dims()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn heads(&self) -> &Tensor {
        &self.heads
    }

    pub fn relations(&self) -> &Tensor {
        &self.relations
    }

    pub fn tails(&self) -> &Tensor {
        &self.tails
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_triples_columns() {
        let triples = [Triple::new(0, 1, 2), Triple::from((3, 0, 4))];
        let batch = TripleBatch::from_triples(&triples, &Device::Cpu).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.heads().to_vec1::<u32>().unwrap(), vec![0, 3]);
        assert_eq!(batch.relations().to_vec1::<u32>().unwrap(), vec![1, 0]);
        assert_eq!(batch.tails().to_vec1::<u32>().unwrap(), vec![2, 4]);
    }

    #[test]
    fn test_unequal_columns_rejected() {
        let err = TripleBatch::from_ids(&[0, 1], &[0], &[1, 2], &Device::Cpu).unwrap_err();
        assert!(matches!(
            err,
            KgeError::BatchLength { what: "relations", expected: 2, got: 1 }
        ));
    }

    #[test]
    fn test_non_vector_ids_rejected() {
        let heads = Tensor::zeros((2, 2), candle_core::DType::U32, &Device::Cpu).unwrap();
        let ids = Tensor::new(&[0u32, 1], &Device::Cpu).unwrap();
        let err = TripleBatch::new(heads, ids.clone(), ids).unwrap_err();
        assert!(matches!(err, KgeError::Tensor(_)));
    }

    #[test]
    fn test_tail_sweep() {
        let batch = TripleBatch::tail_sweep(2, 1, 4, &Device::Cpu).unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.heads().to_vec1::<u32>().unwrap(), vec![2, 2, 2, 2]);
        assert_eq!(batch.relations().to_vec1::<u32>().unwrap(), vec![1, 1, 1, 1]);
        assert_eq!(batch.tails().to_vec1::<u32>().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_head_sweep() {
        let batch = TripleBatch::head_sweep(0, 3, 3, &Device::Cpu).unwrap();
        assert_eq!(batch.heads().to_vec1::<u32>().unwrap(), vec![0, 1, 2]);
        assert_eq!(batch.tails().to_vec1::<u32>().unwrap(), vec![3, 3, 3]);
    }

    #[test]
    fn test_empty_batch() {
        let batch = TripleBatch::from_triples(&[], &Device::Cpu).unwrap();
        assert!(batch.is_empty());
    }
}
