//! Tests for centered orthonormal transforms and FFT convolution

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2, Array3, ArrayD, IxDyn};
    use rustfft::num_complex::Complex64;
    use spectralfill::FillError;
    use spectralfill::spectral::transform::{
        convolve, forward_transform, inverse_transform, to_complex,
    };

    fn sample_plane(rows: usize, cols: usize) -> Array2<Complex64> {
        Array2::from_shape_fn((rows, cols), |(row, col)| {
            Complex64::new(
                (row as f64 * 0.7 + col as f64 * 1.3).sin(),
                (row as f64 * 0.2 - col as f64 * 0.9).cos(),
            )
        })
    }

    fn max_difference<'a>(
        a: impl IntoIterator<Item = &'a Complex64>,
        b: impl IntoIterator<Item = &'a Complex64>,
    ) -> f64 {
        a.into_iter()
            .zip(b)
            .map(|(x, y)| (x - y).norm())
            .fold(0.0, f64::max)
    }

    // Tests forward then inverse recovers a complex plane, odd sizes included
    // Verified by using the forward shift for both directions
    #[test]
    fn test_round_trip_complex_plane() {
        for (rows, cols) in [(8, 8), (5, 7), (6, 3)] {
            let plane = sample_plane(rows, cols);
            let spectrum = forward_transform(&plane).expect("forward transform failed");
            let recovered = inverse_transform(&spectrum).expect("inverse transform failed");
            assert!(
                max_difference(&plane, &recovered) < 1e-9,
                "round trip drifted for {rows}x{cols}"
            );
        }
    }

    // Tests forward then inverse recovers a real multi-channel image
    // Verified by transforming only the first channel
    #[test]
    fn test_round_trip_real_channels() {
        let image = Array3::from_shape_fn((6, 5, 3), |(row, col, channel)| {
            ((row * 7 + col * 3 + channel * 11) % 13) as f64 / 13.0
        });
        let field = to_complex(&image);
        let spectrum = forward_transform(&field).expect("forward transform failed");
        let recovered = inverse_transform(&spectrum).expect("inverse transform failed");

        assert_eq!(recovered.shape(), image.shape());
        for (value, original) in recovered.iter().zip(image.iter()) {
            assert!((value.re - original).abs() < 1e-9);
            assert!(value.im.abs() < 1e-9);
        }
    }

    // Tests the transform preserves energy under orthonormal scaling
    // Verified by dropping the 1/sqrt(n) factor
    #[test]
    fn test_forward_preserves_energy() {
        let plane = sample_plane(8, 6);
        let spectrum = forward_transform(&plane).expect("forward transform failed");
        let energy_in: f64 = plane.iter().map(Complex64::norm_sqr).sum();
        let energy_out: f64 = spectrum.iter().map(Complex64::norm_sqr).sum();
        assert!((energy_in - energy_out).abs() < 1e-9);
    }

    // Tests the zero frequency of a constant plane lands at the array center
    // Verified by omitting the shift after the transform
    #[test]
    fn test_constant_plane_peaks_at_center() {
        let plane = Array2::from_elem((4, 6), Complex64::new(2.0, 0.0));
        let spectrum = forward_transform(&plane).expect("forward transform failed");

        let expected = 2.0 * (24.0_f64).sqrt();
        assert!((spectrum[(2, 3)].re - expected).abs() < 1e-9);
        let off_center: f64 = spectrum
            .indexed_iter()
            .filter(|&((row, col), _)| (row, col) != (2, 3))
            .map(|(_, value)| value.norm())
            .sum();
        assert!(off_center < 1e-9);
    }

    // Tests one-dimensional input is rejected
    // Verified by allowing any rank through the plane dispatch
    #[test]
    fn test_rejects_one_dimensional_field() {
        let line = Array1::from_elem(8, Complex64::new(1.0, 0.0));
        assert!(matches!(
            forward_transform(&line),
            Err(FillError::Computation { .. })
        ));
    }

    // Tests a single plane is replicated across the channels of the other operand
    // Verified by skipping the rank promotion
    #[test]
    fn test_convolve_promotes_plane_to_channels() {
        let plane = ArrayD::from_elem(IxDyn(&[4, 4]), Complex64::new(0.0, 0.0));
        let stack = ArrayD::from_elem(IxDyn(&[4, 4, 3]), Complex64::new(1.0, 0.0));

        let result = convolve(plane.view(), stack.view()).expect("convolution failed");
        assert_eq!(result.shape(), &[4, 4, 3]);
        assert!(result.iter().all(|value| value.norm() < 1e-12));

        let swapped = convolve(stack.view(), plane.view()).expect("convolution failed");
        assert_eq!(swapped.shape(), &[4, 4, 3]);
    }

    // Tests operands with different spatial shapes are rejected
    // Verified by broadcasting instead of comparing shapes
    #[test]
    fn test_convolve_rejects_spatial_mismatch() {
        let a = ArrayD::from_elem(IxDyn(&[4, 4]), Complex64::new(1.0, 0.0));
        let b = ArrayD::from_elem(IxDyn(&[4, 5]), Complex64::new(1.0, 0.0));
        assert!(matches!(
            convolve(a.view(), b.view()),
            Err(FillError::ShapeMismatch { .. })
        ));
    }
}
