//! Gaussian kernels laid out for the centered transforms, and gaussian blur

use crate::io::error::{Result, computation_error};
use crate::spectral::transform::{convolve, to_complex};
use ndarray::{Array, Array1, Array2, Axis, Dimension, Zip};
use rustfft::num_complex::Complex64;

/// Separable gaussian `exp(-std * r^2)` sampled over a `(rows, cols)` grid
///
/// Coordinates run from -1 up to (but excluding) 1 along each axis with zero at
/// index `n / 2`, and the longer axis is stretched by the aspect ratio so the kernel
/// stays circular on non-square grids. Larger `std` gives a narrower kernel. An
/// imaginary `std` produces a unit-magnitude oscillating kernel instead of a decaying one.
///
/// With `edge_filter` the gaussian is multiplied by `1 - std * r^2`, the normalized
/// second derivative, turning it into a band-pass kernel.
pub fn gaussian_kernel(
    rows: usize,
    cols: usize,
    std: impl Into<Complex64>,
    edge_filter: bool,
) -> Array2<Complex64> {
    let std = std.into();
    let shortest = rows.min(cols).max(1) as f64;
    let x = axis_coordinates(rows, rows as f64 / shortest);
    let y = axis_coordinates(cols, cols as f64 / shortest);
    let kx = x.mapv(|value| (std * -(value * value)).exp());
    let ky = y.mapv(|value| (std * -(value * value)).exp());

    let mut kernel = Array2::zeros((rows, cols));
    Zip::from(kernel.rows_mut())
        .and(&x)
        .and(&kx)
        .for_each(|row, &xv, &kxv| {
            Zip::from(row).and(&y).and(&ky).for_each(|value, &yv, &kyv| {
                let gaussian = kxv * kyv;
                *value = if edge_filter {
                    let radius_sq = xv.mul_add(xv, yv * yv);
                    gaussian * (Complex64::new(1.0, 0.0) - std * radius_sq)
                } else {
                    gaussian
                };
            });
        });
    kernel
}

fn axis_coordinates(len: usize, scale: f64) -> Array1<f64> {
    Array1::from_shape_fn(len, |index| {
        (index as f64 / len as f64).mul_add(2.0, -1.0) * scale
    })
}

/// Blur every channel of `data` with a unit-energy gaussian of the given `std`
///
/// The kernel spans the whole spatial extent of `data` and the convolution is
/// circular. `std` near zero approaches the per-channel global mean. For narrower
/// kernels only relative values are meaningful; callers normalize the result.
///
/// # Errors
///
/// Returns an error if:
/// - `data` is neither 2- nor 3-dimensional
/// - The kernel has no energy (empty data)
pub fn gaussian_blur<D: Dimension>(data: &Array<f64, D>, std: f64) -> Result<Array<f64, D>> {
    if data.ndim() < 2 {
        return Err(computation_error(
            "gaussian_blur",
            &format!("expected a 2D or 3D array, got {} dimensions", data.ndim()),
        ));
    }
    let rows = data.len_of(Axis(0));
    let cols = data.len_of(Axis(1));

    let kernel = gaussian_kernel(rows, cols, std, false);
    let energy = kernel.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if !(energy > 0.0) {
        return Err(computation_error("gaussian_blur", &"kernel has no energy"));
    }
    let kernel = kernel.mapv(|value| value / energy);

    let blurred = convolve(to_complex(data).into_dyn().view(), kernel.into_dyn().view())?;
    Ok(blurred.mapv(|value| value.re).into_dimensionality::<D>()?)
}
