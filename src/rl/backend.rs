//! Backend type aliases and tensor conversion
//!
//! Observations leave the environment as plain `Vec<f32>`; training code
//! built on Burn converts them here. The NdArray backend is enough for the
//! small feature vectors this environment produces.
//!
//! # Example
//!
//! ```rust
//! use rl_snake::rl::{InferenceBackend, default_device, observation_batch};
//!
//! let device = default_device();
//! let batch = observation_batch::<InferenceBackend>(&[vec![0.0; 11], vec![1.0; 11]], &device)
//!     .unwrap();
//! assert_eq!(batch.dims(), [2, 11]);
//! ```

use burn::backend::ndarray::{NdArray, NdArrayDevice};
use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::error::{Result, SnakeError};

/// Backend type for consuming observations on the CPU
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

/// Single observation as a rank-1 tensor
pub fn observation_tensor<B: Backend>(observation: &[f32], device: &B::Device) -> Tensor<B, 1> {
    let data = TensorData::new(observation.to_vec(), [observation.len()]);
    Tensor::<B, 1>::from_data(data, device)
}

/// Stack equally sized observations into a `[batch, features]` tensor
pub fn observation_batch<B: Backend>(
    observations: &[Vec<f32>],
    device: &B::Device,
) -> Result<Tensor<B, 2>> {
    let Some(first) = observations.first() else {
        return Err(SnakeError::BatchMismatch {
            expected: 1,
            actual: 0,
        });
    };
    let width = first.len();

    let mut flat = Vec::with_capacity(observations.len() * width);
    for observation in observations {
        if observation.len() != width {
            return Err(SnakeError::BatchMismatch {
                expected: width,
                actual: observation.len(),
            });
        }
        flat.extend_from_slice(observation);
    }

    let data = TensorData::new(flat, [observations.len(), width]);
    Ok(Tensor::<B, 2>::from_data(data, device))
}
