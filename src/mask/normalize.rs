//! Rescaling arrays onto the unit interval

use crate::io::error::{Result, computation_error};
use crate::math::channels::value_range;
use ndarray::{Array, Dimension};

/// Shift `data` so its minimum is zero, then divide by the new maximum
///
/// # Errors
///
/// Returns an error if `data` is empty or constant, since there is no range to
/// stretch onto [0, 1]
pub fn normalize_image<D: Dimension>(data: &Array<f64, D>) -> Result<Array<f64, D>> {
    let (min, max) = value_range(data)
        .ok_or_else(|| computation_error("normalize_image", &"array is empty"))?;
    let range = max - min;
    if !(range > 0.0) {
        return Err(computation_error(
            "normalize_image",
            &format!("array is constant at {min}, nothing to normalize"),
        ));
    }
    Ok(data.mapv(|value| (value - min) / range))
}
