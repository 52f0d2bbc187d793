//! Conversion between `image` buffers and `ndarray` arrays, resizing and PNG export

use crate::io::error::{FillError, Result, computation_error, invalid_parameter, shape_mismatch};
use crate::math::channels::{RGB_CHANNELS, grey_to_rgb};
use crate::pipeline::resolution::Resolution;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, Rgba};
use ndarray::{Array2, Array3};
use std::path::Path;

/// Decode an image file of any supported format
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| FillError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Resize to `resolution` with Lanczos3 resampling, or return the image unchanged
/// when it is already that size
pub fn resize_to(image: &DynamicImage, resolution: Resolution) -> DynamicImage {
    if image.width() == resolution.width && image.height() == resolution.height {
        return image.clone();
    }
    image.resize_exact(resolution.width, resolution.height, FilterType::Lanczos3)
}

/// RGB channels as a `(rows, cols, 3)` array in [0, 1]
///
/// # Errors
///
/// Returns an error if the decoded buffer does not match the image dimensions
pub fn rgb_to_array(image: &DynamicImage) -> Result<Array3<f64>> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let values = rgb
        .into_raw()
        .into_iter()
        .map(|byte| f64::from(byte) / 255.0)
        .collect::<Vec<_>>();
    Ok(Array3::from_shape_vec(
        (height as usize, width as usize, RGB_CHANNELS),
        values,
    )?)
}

/// Alpha coverage replicated over three channels, or `None` for opaque formats
///
/// # Errors
///
/// Returns an error if the decoded buffer does not match the image dimensions
pub fn alpha_to_mask(image: &DynamicImage) -> Result<Option<Array3<f64>>> {
    if !image.color().has_alpha() {
        return Ok(None);
    }
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let alpha = rgba
        .pixels()
        .map(|&Rgba([_, _, _, alpha])| f64::from(alpha) / 255.0)
        .collect::<Vec<_>>();
    let plane = Array2::from_shape_vec((height as usize, width as usize), alpha)?;
    Ok(Some(grey_to_rgb(&plane)))
}

/// Quantize a `(rows, cols, 3)` array in [0, 1] into an 8-bit RGB image
///
/// Values are clipped to [0, 1], scaled by 255 and rounded.
///
/// # Errors
///
/// Returns an error if the array does not have three channels or is too large
/// for an image buffer
pub fn array_to_rgb(data: &Array3<f64>) -> Result<RgbImage> {
    let (rows, cols, channels) = data.dim();
    if channels != RGB_CHANNELS {
        return Err(shape_mismatch(
            "array_to_rgb",
            &[rows, cols, RGB_CHANNELS],
            data.shape(),
        ));
    }
    let width =
        u32::try_from(cols).map_err(|err| invalid_parameter("width", &cols, &err))?;
    let height =
        u32::try_from(rows).map_err(|err| invalid_parameter("height", &rows, &err))?;

    let bytes = data.iter().map(|&value| quantize(value)).collect::<Vec<_>>();
    RgbImage::from_raw(width, height, bytes)
        .ok_or_else(|| computation_error("array_to_rgb", &"buffer does not match dimensions"))
}

fn quantize(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Write an RGB image as PNG, creating parent directories as needed
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written
pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| FillError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }
    image.save(path).map_err(|source| FillError::ImageExport {
        path: path.to_path_buf(),
        source,
    })
}
