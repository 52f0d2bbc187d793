//! Noise synthesis for erased regions

/// Colour matching mask derived from the blend mask
pub mod hsv_mask;
/// Shaped noise generation and final composite
pub mod shaping;

pub use shaping::NoiseShaper;
