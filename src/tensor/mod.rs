//! Tensor helpers for transd.
//!
//! This module provides parameter initialization and device selection.

mod init;

pub use init::{glorot_normal, glorot_std, seeded_rng};

use candle_core::Device;

/// Pick the compute device: Metal or CUDA when the matching feature is
/// enabled and the device opens, otherwise CPU.
pub fn default_device() -> Device {
    #[cfg(feature = "metal")]
    let device = Device::new_metal(0).unwrap_or(Device::Cpu);
    #[cfg(all(feature = "cuda", not(feature = "metal")))]
    let device = Device::new_cuda(0).unwrap_or(Device::Cpu);
    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    let device = Device::Cpu;

    device
}
