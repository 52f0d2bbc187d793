//! Frequency-domain utilities shared by mask construction and noise shaping

/// Gaussian kernel construction and gaussian blur
pub mod kernel;
/// Centered orthonormal transforms and FFT convolution
pub mod transform;

pub use kernel::{gaussian_blur, gaussian_kernel};
pub use transform::{convolve, forward_transform, inverse_transform, to_complex};
