//! Blend mask construction from alpha coverage
//!
//! The raw mask is the alpha coverage of the input (1 keeps a pixel, 0 erases it).
//! The blend mask uses the opposite convention: 1 marks pixels to be fully
//! synthesized and 0 marks pixels kept as-is, with a smooth falloff between them.

use crate::io::configuration::{BLEND_MASK_BLUR_STD, UNIFORM_MASK_EXPONENT};
use crate::io::error::{Result, invalid_parameter, shape_mismatch};
use crate::mask::normalize::normalize_image;
use crate::math::channels::{RGB_CHANNELS, value_range};
use crate::spectral::kernel::gaussian_blur;
use ndarray::Array3;

/// Build the soft blend mask from a 3-channel alpha coverage mask
///
/// The inverted coverage is blurred, stretched onto [0, 1] and scaled by the
/// maximum opacity: `strength` when positive, otherwise the coverage's own maximum.
/// A coverage mask with a single value has no transition to blur; its erased
/// distance is taken as zero everywhere, so the result is uniformly
/// `1 - max_opacity`.
///
/// # Errors
///
/// Returns an error if:
/// - `raw_mask` does not have exactly three channels
/// - `raw_mask` is empty
/// - `strength` is negative or not finite
pub fn build_blend_mask(raw_mask: &Array3<f64>, strength: f64) -> Result<Array3<f64>> {
    let (rows, cols, channels) = raw_mask.dim();
    if channels != RGB_CHANNELS {
        return Err(shape_mismatch(
            "build_blend_mask",
            &[rows, cols, RGB_CHANNELS],
            raw_mask.shape(),
        ));
    }
    if !(strength >= 0.0 && strength.is_finite()) {
        return Err(invalid_parameter(
            "strength",
            &strength,
            &"must be a finite non-negative number",
        ));
    }
    let (min, max) = value_range(raw_mask).ok_or_else(|| {
        invalid_parameter("raw_mask", &format!("{rows}x{cols}"), &"mask is empty")
    })?;

    let max_opacity = if strength > 0.0 {
        strength.clamp(0.0, 1.0)
    } else {
        max
    };

    let erased_distance = if max > min {
        let inverted = raw_mask.mapv(|value| 1.0 - value);
        normalize_image(&gaussian_blur(&inverted, BLEND_MASK_BLUR_STD)?)?
    } else {
        Array3::zeros(raw_mask.raw_dim())
    };

    Ok(erased_distance.mapv(|distance| (1.0 - distance).mul_add(-max_opacity, 1.0)))
}

/// Uniform blend mask used when the input carries no alpha channel
///
/// Every pixel gets `strength^0.075` clipped to [0, 1], on three channels.
pub fn uniform_mask(rows: usize, cols: usize, strength: f64) -> Array3<f64> {
    let opacity = strength.max(0.0).powf(UNIFORM_MASK_EXPONENT).clamp(0.0, 1.0);
    Array3::from_elem((rows, cols, RGB_CHANNELS), opacity)
}

/// True when any pixel of the blend mask asks for synthesis
pub fn has_erased_region(blend_mask: &Array3<f64>) -> bool {
    blend_mask.iter().any(|&value| value > 0.0)
}

/// Fraction of mask samples at or above `threshold`
pub fn erased_fraction(blend_mask: &Array3<f64>, threshold: f64) -> f64 {
    if blend_mask.is_empty() {
        return 0.0;
    }
    let erased = blend_mask.iter().filter(|&&value| value >= threshold).count();
    erased as f64 / blend_mask.len() as f64
}
