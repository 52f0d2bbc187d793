//! Clamping and rounding of output resolutions

use crate::io::configuration::ResolutionSettings;

/// Output size handed to the generator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    /// Create a resolution from a width and height
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Clamp a requested size to the maximum and round it to the granularity
///
/// Missing dimensions come from `reference` (usually the input image size), or
/// from the configured default when there is no reference. A width above the
/// maximum is clamped first and the height recomputed from the aspect ratio;
/// the height is then clamped the same way, recomputing the width. That order
/// is fixed: for extreme aspect ratios the recomputed width may end up slightly
/// above the maximum width, and the result is kept as-is.
///
/// Each dimension is finally rounded to the nearest multiple of the granularity,
/// never below one granularity step.
pub fn valid_resolution(
    width: Option<u32>,
    height: Option<u32>,
    reference: Option<Resolution>,
    settings: &ResolutionSettings,
) -> Resolution {
    let fallback = reference.unwrap_or(Resolution::new(settings.default.0, settings.default.1));
    let mut width = f64::from(width.filter(|&w| w > 0).unwrap_or(fallback.width).max(1));
    let mut height = f64::from(height.filter(|&h| h > 0).unwrap_or(fallback.height).max(1));

    let aspect_ratio = width / height;
    let (max_width, max_height) = (f64::from(settings.max.0), f64::from(settings.max.1));

    if width > max_width {
        width = max_width;
        height = (width / aspect_ratio + 0.5).floor();
    }
    if height > max_height {
        height = max_height;
        width = (height * aspect_ratio + 0.5).floor();
    }

    Resolution::new(
        round_to_granularity(width, settings.granularity),
        round_to_granularity(height, settings.granularity),
    )
}

fn round_to_granularity(value: f64, granularity: u32) -> u32 {
    let granularity = granularity.max(1);
    let steps = (value / f64::from(granularity) + 0.5).floor() as u32;
    steps.max(1) * granularity
}
