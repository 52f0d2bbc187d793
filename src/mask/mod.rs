//! Mask normalization and blend mask construction

/// Blend mask and uniform mask builders
pub mod blend;
/// Unit-interval normalization
pub mod normalize;

pub use blend::{build_blend_mask, uniform_mask};
pub use normalize::normalize_image;
