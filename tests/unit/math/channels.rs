//! Tests for greyscale and RGB channel conversion

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3, array};
    use spectralfill::math::channels::{RGB_CHANNELS, grey_to_rgb, rgb_to_grey, value_range};

    // Tests greyscale is the unweighted channel mean
    // Verified by using luma weights instead
    #[test]
    fn test_rgb_to_grey_averages_channels() {
        let rgb = Array3::from_shape_vec((1, 2, 3), vec![0.0, 0.3, 0.6, 1.0, 1.0, 1.0])
            .expect("valid shape");
        let grey = rgb_to_grey(&rgb);
        assert_eq!(grey.dim(), (1, 2));
        assert!((grey[(0, 0)] - 0.3).abs() < 1e-12);
        assert!((grey[(0, 1)] - 1.0).abs() < 1e-12);
    }

    // Tests a plane is copied into every channel
    // Verified by filling only the first channel
    #[test]
    fn test_grey_to_rgb_replicates() {
        let grey = array![[0.1, 0.2], [0.3, 0.4]];
        let rgb = grey_to_rgb(&grey);
        assert_eq!(rgb.dim(), (2, 2, RGB_CHANNELS));
        for ((row, col, _), value) in rgb.indexed_iter() {
            assert!((value - grey[(row, col)]).abs() < f64::EPSILON);
        }
    }

    // Tests the value range of filled and empty arrays
    // Verified by seeding the fold with zero
    #[test]
    fn test_value_range() {
        let data = array![[3.0, -1.5], [2.0, 0.5]];
        assert_eq!(value_range(&data), Some((-1.5, 3.0)));

        let empty = Array2::<f64>::zeros((0, 0));
        assert_eq!(value_range(&empty), None);
    }
}
