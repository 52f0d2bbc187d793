//! Mask deciding how strongly shaped noise is pulled toward the source palette
//!
//! Colour matching is strongest inside the transition zone of the blend mask and
//! fades with distance from it. The falloff is near-global (blur std 4000) and its
//! edge is sharpened by `hardness`.

use crate::io::configuration::{HSV_MASK_BLUR_STD, HSV_MASK_OFFSET};
use crate::io::error::Result;
use crate::mask::normalize::normalize_image;
use crate::math::channels::value_range;
use crate::spectral::kernel::gaussian_blur;
use ndarray::Array3;

const CLIP_FLOOR: f64 = 1e-20;
const LOG_FLOOR: f64 = 1e-8;

/// Build the colour matching mask from a blend mask
///
/// A `hardness` of zero disables the falloff entirely and matches colours
/// everywhere, whatever the blend mask looks like.
///
/// # Errors
///
/// Returns an error if `hardness` is positive and the blend mask has no transition
/// zone (every sample fully kept or fully erased), since it cannot be normalized
pub fn hsv_blend_mask(blend_mask: &Array3<f64>, hardness: f64) -> Result<Array3<f64>> {
    if hardness <= 0.0 {
        return Ok(Array3::ones(blend_mask.raw_dim()));
    }

    let transition = blend_mask.mapv(|value| {
        (1.0 - value) * (value - CLIP_FLOOR).clamp(0.0, 1.0).powf(HSV_MASK_OFFSET)
    });
    let transition = normalize_image(&transition)?;

    let spread = normalize_image(&gaussian_blur(&transition, HSV_MASK_BLUR_STD)?)?
        .mapv(|value| (value + LOG_FLOOR).min(1.0));

    let mut distance = spread.mapv(|value| value.ln().abs().sqrt().max(0.0));
    if let Some((min, _)) = value_range(&distance) {
        distance.mapv_inplace(|value| value - min);
    }

    normalize_image(&distance.mapv(|value| (-hardness * value * value).exp()))
}
