//! Centered, orthonormal 2D Fourier transforms and FFT convolution
//!
//! Arrays are either a single plane `(rows, cols)` or a stack of planes
//! `(rows, cols, channels)`; every plane is transformed independently. The zero
//! frequency is moved to the array center before the transform and back afterward,
//! and both directions are scaled by `1 / sqrt(rows * cols)` so a forward/inverse
//! pair is the identity.

use crate::io::error::{Result, computation_error, shape_mismatch};
use ndarray::{
    Array, Array2, ArrayD, ArrayView2, ArrayViewD, ArrayViewMut2, Axis, Dimension, Ix2, IxDyn, s,
};
use rustfft::num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

/// Forward transform of every plane in `field`
///
/// # Errors
///
/// Returns an error if `field` is neither 2- nor 3-dimensional
pub fn forward_transform<D: Dimension>(field: &Array<Complex64, D>) -> Result<Array<Complex64, D>> {
    transform_planes(field, FftDirection::Forward)
}

/// Inverse transform of every plane in `field`
///
/// # Errors
///
/// Returns an error if `field` is neither 2- nor 3-dimensional
pub fn inverse_transform<D: Dimension>(field: &Array<Complex64, D>) -> Result<Array<Complex64, D>> {
    transform_planes(field, FftDirection::Inverse)
}

/// Lift a real array into the complex domain
pub fn to_complex<D: Dimension>(field: &Array<f64, D>) -> Array<Complex64, D> {
    field.mapv(|value| Complex64::new(value, 0.0))
}

/// Circular convolution of two fields through the frequency domain
///
/// A single plane convolved against a stack of planes is replicated across the
/// stack's channels first, so a grey kernel can be applied to an RGB image.
///
/// # Errors
///
/// Returns an error if:
/// - Either operand is neither 2- nor 3-dimensional
/// - The operands differ in spatial shape or channel count after promotion
pub fn convolve(
    a: ArrayViewD<'_, Complex64>,
    b: ArrayViewD<'_, Complex64>,
) -> Result<ArrayD<Complex64>> {
    let (a, b) = promote_pair(a, b)?;
    if a.shape() != b.shape() {
        return Err(shape_mismatch("convolve", a.shape(), b.shape()));
    }

    let spectrum_a = forward_transform(&a)?;
    let spectrum_b = forward_transform(&b)?;
    inverse_transform(&(spectrum_a * &spectrum_b))
}

fn promote_pair(
    a: ArrayViewD<'_, Complex64>,
    b: ArrayViewD<'_, Complex64>,
) -> Result<(ArrayD<Complex64>, ArrayD<Complex64>)> {
    match (a.ndim(), b.ndim()) {
        (2, 3) => {
            let channels = b.len_of(Axis(2));
            Ok((replicate_channels(a, channels)?, b.to_owned()))
        }
        (3, 2) => {
            let channels = a.len_of(Axis(2));
            Ok((a.to_owned(), replicate_channels(b, channels)?))
        }
        _ => Ok((a.to_owned(), b.to_owned())),
    }
}

fn replicate_channels(
    plane: ArrayViewD<'_, Complex64>,
    channels: usize,
) -> Result<ArrayD<Complex64>> {
    let target = IxDyn(&[plane.len_of(Axis(0)), plane.len_of(Axis(1)), channels]);
    let source_shape = plane.shape().to_vec();
    plane
        .insert_axis(Axis(2))
        .broadcast(target.clone())
        .map(|view| view.to_owned())
        .ok_or_else(|| shape_mismatch("convolve", target.slice(), &source_shape))
}

fn transform_planes<D: Dimension>(
    field: &Array<Complex64, D>,
    direction: FftDirection,
) -> Result<Array<Complex64, D>> {
    let mut planner = FftPlanner::new();
    let mut output = field.to_owned().into_dyn();

    match output.ndim() {
        2 => {
            let plane = output.view_mut().into_dimensionality::<Ix2>()?;
            transform_plane(plane, direction, &mut planner);
        }
        3 => {
            for plane in output.axis_iter_mut(Axis(2)) {
                transform_plane(plane.into_dimensionality::<Ix2>()?, direction, &mut planner);
            }
        }
        ndim => {
            return Err(computation_error(
                "fourier transform",
                &format!("expected a 2D or 3D array, got {ndim} dimensions"),
            ));
        }
    }

    Ok(output.into_dimensionality::<D>()?)
}

fn transform_plane(
    mut plane: ArrayViewMut2<'_, Complex64>,
    direction: FftDirection,
    planner: &mut FftPlanner<f64>,
) {
    let (rows, cols) = plane.dim();
    if rows == 0 || cols == 0 {
        return;
    }

    let mut work = roll(plane.view(), rows / 2, cols / 2);

    let row_fft = planner.plan_fft(cols, direction);
    for mut row in work.rows_mut() {
        let mut buffer = row.to_vec();
        row_fft.process(&mut buffer);
        row.iter_mut()
            .zip(buffer)
            .for_each(|(dst, value)| *dst = value);
    }

    let column_fft = planner.plan_fft(rows, direction);
    for mut column in work.columns_mut() {
        let mut buffer = column.to_vec();
        column_fft.process(&mut buffer);
        column
            .iter_mut()
            .zip(buffer)
            .for_each(|(dst, value)| *dst = value);
    }

    let scale = 1.0 / ((rows * cols) as f64).sqrt();
    let centered = roll(work.view(), rows - rows / 2, cols - cols / 2);
    plane.zip_mut_with(&centered, |dst, &value| *dst = value * scale);
}

// Cyclic shift so that element (r, c) lands at (r + shift_rows, c + shift_cols)
fn roll(
    plane: ArrayView2<'_, Complex64>,
    shift_rows: usize,
    shift_cols: usize,
) -> Array2<Complex64> {
    let (rows, cols) = plane.dim();
    let mut rolled = Array2::zeros((rows, cols));
    if rows == 0 || cols == 0 {
        return rolled;
    }
    let (sr, sc) = (shift_rows % rows, shift_cols % cols);
    let (kr, kc) = (rows - sr, cols - sc);

    rolled
        .slice_mut(s![sr.., sc..])
        .assign(&plane.slice(s![..kr, ..kc]));
    rolled
        .slice_mut(s![sr.., ..sc])
        .assign(&plane.slice(s![..kr, kc..]));
    rolled
        .slice_mut(s![..sr, sc..])
        .assign(&plane.slice(s![kr.., ..kc]));
    rolled
        .slice_mut(s![..sr, ..sc])
        .assign(&plane.slice(s![kr.., kc..]));
    rolled
}
