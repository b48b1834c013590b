//! Glorot/Xavier-normal parameter initialization.

use candle_core::{Device, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::error::{KgeError, Result};

/// Standard deviation of a Glorot-normal draw for a `[rows, cols]` matrix:
/// sqrt(2 / (fan_in + fan_out)).
pub fn glorot_std(rows: usize, cols: usize) -> f64 {
    (2.0 / (rows + cols) as f64).sqrt()
}

/// RNG for parameter initialization; seeded when a seed is given.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draw a `[rows, cols]` f32 matrix from N(0, glorot_std(rows, cols)^2).
pub fn glorot_normal(rows: usize, cols: usize, rng: &mut StdRng, device: &Device) -> Result<Tensor> {
    let std = glorot_std(rows, cols) as f32;
    let normal = Normal::new(0.0f32, std)
        .map_err(|e| KgeError::InvalidConfig(format!("glorot std {} for [{}, {}]: {}", std, rows, cols, e)))?;

    let data: Vec<f32> = (0..rows * cols).map(|_| normal.sample(rng)).collect();
    Ok(Tensor::from_vec(data, (rows, cols), device)?)
}
