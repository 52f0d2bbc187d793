//! RGB and HSV conversion over whole arrays with masked hue/saturation/value blending
//!
//! Hue is stored as a fraction of a full turn in [0, 1) so it can be interpolated
//! alongside saturation and value. Conversions are unclamped: shaped noise may carry
//! values above one and those must survive the round trip.

use crate::io::error::{Result, shape_mismatch};
use crate::math::channels::RGB_CHANNELS;
use ndarray::{Array3, Axis, Zip, s};
use palette::convert::FromColorUnclamped;
use palette::{Hsv, RgbHue, Srgb, encoding};

type HsvColor = Hsv<encoding::Srgb, f64>;

/// Convert an RGB array into (hue, saturation, value) channels
///
/// # Errors
///
/// Returns an error if `rgb` does not have exactly three channels
pub fn rgb_to_hsv(rgb: &Array3<f64>) -> Result<Array3<f64>> {
    check_channels("rgb_to_hsv", rgb)?;
    Ok(convert_pixels(rgb, |red, green, blue| {
        let color = HsvColor::from_color_unclamped(Srgb::new(red, green, blue));
        (
            color.hue.into_positive_degrees() / 360.0,
            color.saturation,
            color.value,
        )
    }))
}

/// Convert (hue, saturation, value) channels back into RGB
///
/// # Errors
///
/// Returns an error if `hsv` does not have exactly three channels
pub fn hsv_to_rgb(hsv: &Array3<f64>) -> Result<Array3<f64>> {
    check_channels("hsv_to_rgb", hsv)?;
    Ok(convert_pixels(hsv, |hue, saturation, value| {
        let color = HsvColor::new(RgbHue::from_degrees(hue * 360.0), saturation, value);
        let rgb = Srgb::<f64>::from_color_unclamped(color);
        (rgb.red, rgb.green, rgb.blue)
    }))
}

fn check_channels(operation: &'static str, data: &Array3<f64>) -> Result<()> {
    let (rows, cols, channels) = data.dim();
    if channels == RGB_CHANNELS {
        Ok(())
    } else {
        Err(shape_mismatch(
            operation,
            &[rows, cols, RGB_CHANNELS],
            data.shape(),
        ))
    }
}

// Callers guarantee three channels
fn convert_pixels(
    input: &Array3<f64>,
    convert: impl Fn(f64, f64, f64) -> (f64, f64, f64),
) -> Array3<f64> {
    let mut output = Array3::<f64>::zeros(input.raw_dim());
    let (first, second, third) =
        output.multi_slice_mut((s![.., .., 0], s![.., .., 1], s![.., .., 2]));
    Zip::from(first)
        .and(second)
        .and(third)
        .and(input.index_axis(Axis(2), 0))
        .and(input.index_axis(Axis(2), 1))
        .and(input.index_axis(Axis(2), 2))
        .for_each(|a, b, c, &x, &y, &z| {
            (*a, *b, *c) = convert(x, y, z);
        });
    output
}

/// Pull `image` toward the hue, saturation and value of `match_to`
///
/// Each HSV channel is linearly interpolated by the matching mask channel; a mask
/// of one takes `match_to` entirely. Without a mask the result is `match_to`.
///
/// # Errors
///
/// Returns an error if the arrays are not 3-channel or do not share a shape
pub fn hsv_blend_image(
    image: &Array3<f64>,
    match_to: &Array3<f64>,
    hsv_mask: Option<&Array3<f64>>,
) -> Result<Array3<f64>> {
    check_channels("hsv_blend_image", image)?;
    if image.shape() != match_to.shape() {
        return Err(shape_mismatch(
            "hsv_blend_image",
            image.shape(),
            match_to.shape(),
        ));
    }
    if let Some(mask) = hsv_mask
        && mask.shape() != image.shape()
    {
        return Err(shape_mismatch("hsv_blend_image", image.shape(), mask.shape()));
    }

    let image_hsv = rgb_to_hsv(image)?;
    let match_hsv = rgb_to_hsv(match_to)?;
    let blended = match hsv_mask {
        Some(mask) => {
            let mut blended = image_hsv;
            Zip::from(&mut blended)
                .and(&match_hsv)
                .and(mask)
                .for_each(|value, &target, &weight| {
                    *value = (*value).mul_add(1.0 - weight, weight * target);
                });
            blended
        }
        None => match_hsv,
    };
    hsv_to_rgb(&blended)
}
