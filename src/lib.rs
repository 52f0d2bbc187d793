//! Frequency-domain noise seeding for generative in- and out-painting
//!
//! Erased (transparent) regions of an image are filled with noise whose local
//! scale, orientation and colour statistics follow the kept part of the image,
//! then blended in under a soft mask. The seeded image and its mask are what an
//! external generator consumes.

#![deny(unsafe_code)]

/// File handling, configuration, errors and the command-line front end
pub mod io;
/// Blend mask construction and normalization
pub mod mask;
/// Channel and colour space conversions
pub mod math;
/// Shaped noise synthesis for erased regions
pub mod noise;
/// Request handling from parameters to the prepared seed
pub mod pipeline;
/// Centered Fourier transforms, convolution and gaussian kernels
pub mod spectral;

pub use io::error::{FillError, Result};
