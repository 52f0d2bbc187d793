//! Tests for RGB/HSV conversion and masked HSV blending

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use spectralfill::FillError;
    use spectralfill::math::colorspace::{hsv_blend_image, hsv_to_rgb, rgb_to_hsv};

    fn pixel(r: f64, g: f64, b: f64) -> Array3<f64> {
        Array3::from_shape_vec((1, 1, 3), vec![r, g, b]).expect("valid shape")
    }

    fn palette() -> Array3<f64> {
        Array3::from_shape_fn((4, 4, 3), |(row, col, channel)| {
            ((row * 5 + col * 3 + channel * 7) % 9) as f64 / 8.0
        })
    }

    fn hsv(rgb: &Array3<f64>) -> Array3<f64> {
        rgb_to_hsv(rgb).expect("three channels")
    }

    fn assert_close(a: &Array3<f64>, b: &Array3<f64>, tolerance: f64) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tolerance, "{x} vs {y}");
        }
    }

    // Tests primary colours map to the expected hue fractions
    // Verified by storing hue in degrees
    #[test]
    fn test_primary_hues() {
        let red = hsv(&pixel(1.0, 0.0, 0.0));
        let green = hsv(&pixel(0.0, 1.0, 0.0));
        let blue = hsv(&pixel(0.0, 0.0, 1.0));

        assert!(red[(0, 0, 0)].abs() < 1e-9);
        assert!((green[(0, 0, 0)] - 1.0 / 3.0).abs() < 1e-9);
        assert!((blue[(0, 0, 0)] - 2.0 / 3.0).abs() < 1e-9);
        assert!((red[(0, 0, 1)] - 1.0).abs() < 1e-9);
        assert!((red[(0, 0, 2)] - 1.0).abs() < 1e-9);
    }

    // Tests grey has no saturation and keeps its value
    // Verified by swapping saturation and value channels
    #[test]
    fn test_grey_is_unsaturated() {
        let grey = hsv(&pixel(0.4, 0.4, 0.4));
        assert!(grey[(0, 0, 1)].abs() < 1e-9);
        assert!((grey[(0, 0, 2)] - 0.4).abs() < 1e-9);
    }

    // Tests RGB survives a trip through HSV
    // Verified by dropping the hue scale on the way back
    #[test]
    fn test_hsv_round_trip() {
        let rgb = palette();
        let back = hsv_to_rgb(&hsv(&rgb)).expect("three channels");
        assert_close(&back, &rgb, 1e-9);
    }

    // Tests a zero mask keeps the image and a unit mask takes the target
    // Verified by swapping the interpolation weights
    #[test]
    fn test_mask_extremes() {
        let image = palette();
        let target = image.mapv(|value| 1.0 - value * 0.5);

        let zeros = Array3::zeros(image.raw_dim());
        let kept = hsv_blend_image(&image, &target, Some(&zeros)).expect("blend failed");
        assert_close(&kept, &image, 1e-9);

        let ones = Array3::ones(image.raw_dim());
        let matched = hsv_blend_image(&image, &target, Some(&ones)).expect("blend failed");
        assert_close(&matched, &target, 1e-9);
    }

    // Tests blending without a mask returns the target colours
    // Verified by returning the image when no mask is given
    #[test]
    fn test_unmasked_blend_takes_target() {
        let image = palette();
        let target = image.mapv(|value| value * 0.25);
        let blended = hsv_blend_image(&image, &target, None).expect("blend failed");
        assert_close(&blended, &target, 1e-9);
    }

    // Tests half way blending interpolates value
    // Verified by interpolating in RGB space
    #[test]
    fn test_half_mask_interpolates_value() {
        let image = pixel(0.2, 0.2, 0.2);
        let target = pixel(0.6, 0.6, 0.6);
        let half = Array3::from_elem((1, 1, 3), 0.5);
        let blended = hsv_blend_image(&image, &target, Some(&half)).expect("blend failed");
        assert_close(&blended, &pixel(0.4, 0.4, 0.4), 1e-9);
    }

    // Tests mismatched shapes are rejected
    // Verified by zipping arrays of different sizes
    #[test]
    fn test_rejects_mismatched_shapes() {
        let image = palette();
        let target = Array3::zeros((4, 5, 3));
        assert!(matches!(
            hsv_blend_image(&image, &target, None),
            Err(FillError::ShapeMismatch { .. })
        ));

        let mask = Array3::zeros((4, 4, 1));
        assert!(hsv_blend_image(&image, &image, Some(&mask)).is_err());

        let grey = Array3::zeros((4, 4, 1));
        assert!(hsv_blend_image(&grey, &grey, None).is_err());
        assert!(rgb_to_hsv(&grey).is_err());
        assert!(hsv_to_rgb(&grey).is_err());
    }
}
