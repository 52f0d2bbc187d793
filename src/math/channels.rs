//! Conversions between single-channel fields and RGB arrays

use ndarray::{Array2, Array3, Axis};

/// Number of colour channels in every RGB array
pub const RGB_CHANNELS: usize = 3;

/// Average the channels of an RGB array into a single-channel field
pub fn rgb_to_grey(data: &Array3<f64>) -> Array2<f64> {
    let channels = data.len_of(Axis(2)).max(1) as f64;
    data.sum_axis(Axis(2)) / channels
}

/// Replicate a single-channel field across three channels
pub fn grey_to_rgb(data: &Array2<f64>) -> Array3<f64> {
    let (rows, cols) = data.dim();
    let mut rgb = Array3::zeros((rows, cols, RGB_CHANNELS));
    for mut plane in rgb.axis_iter_mut(Axis(2)) {
        plane.assign(data);
    }
    rgb
}

/// Minimum and maximum over every element, `None` when the array is empty
pub fn value_range<'a, I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = &'a f64>,
{
    values.into_iter().fold(None, |range, &value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}
