//! Calibrated constants and the runtime settings handed to the orchestrator

use crate::io::error::{Result, invalid_parameter};

// Resolution policy defaults
/// Resolution used when neither a request nor a reference image supplies one
pub const DEFAULT_RESOLUTION: (u32, u32) = (512, 512);
/// Largest width and height handed to the generator
pub const MAX_RESOLUTION: (u32, u32) = (768, 768);
/// Every output dimension is a multiple of this
pub const RESOLUTION_GRANULARITY: u32 = 64;

// Sampling parameter defaults
/// Strength substituted in reference-image mode when none is requested
pub const DEFAULT_STRENGTH: f64 = 0.5;
/// Noise frequency falloff exponent multiplier
pub const DEFAULT_NOISE_Q: f64 = 1.0;
/// Hardness of the colour matching mask
pub const DEFAULT_BLEND_HARDNESS: f64 = 1.0;
/// Amount of colour kept in the base noise before shaping
pub const DEFAULT_COLORFULNESS: f64 = 0.0;

// Magic numbers calibrated against the generator, kept as-is
/// Standard deviation of the blur that softens the raw mask
pub const BLEND_MASK_BLUR_STD: f64 = 1000.0;
/// Standard deviation of the blur that spreads the colour matching mask
pub const HSV_MASK_BLUR_STD: f64 = 4000.0;
/// Exponent applied to the clipped blend mask when building the colour matching mask
pub const HSV_MASK_OFFSET: f64 = 1e-10;
/// Peak magnitude of the complex base noise
pub const NOISE_MAGNITUDE: f64 = 25.0;
/// Base of the `noise_q` exponent shaping the noise magnitude distribution
pub const NOISE_FALLOFF_BASE: f64 = 50.0;
/// Imaginary standard deviation of the oscillatory shaping kernel
pub const OSCILLATOR_STD: f64 = 2_345_234.0;
/// Exponent mapping strength onto the uniform reference-image mask
pub const UNIFORM_MASK_EXPONENT: f64 = 0.075;

// Output settings
/// Suffix added to seed image filenames
pub const SEED_SUFFIX: &str = "_seed";
/// Suffix added to mask image filenames
pub const MASK_SUFFIX: &str = "_mask";
/// Suffix of the per-input debug artifact directory
pub const DEBUG_DIR_SUFFIX: &str = "_debug";
/// Input file extensions picked up when scanning a directory
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Bounds and granularity used by the resolution policy
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionSettings {
    /// Fallback (width, height) when nothing else is known
    pub default: (u32, u32),
    /// Maximum (width, height)
    pub max: (u32, u32),
    /// Multiple every dimension is rounded to
    pub granularity: u32,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            default: DEFAULT_RESOLUTION,
            max: MAX_RESOLUTION,
            granularity: RESOLUTION_GRANULARITY,
        }
    }
}

/// Read-only configuration consumed by the orchestrator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Resolution policy bounds
    pub resolution: ResolutionSettings,
    /// Strength used for reference-image mode when the request leaves it at zero
    pub default_strength: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: ResolutionSettings::default(),
            default_strength: DEFAULT_STRENGTH,
        }
    }
}

impl Settings {
    /// Check that every bound is usable
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The granularity is zero
    /// - Any default or maximum dimension is zero
    /// - The default strength is outside (0, 1]
    pub fn validate(&self) -> Result<()> {
        let resolution = &self.resolution;
        if resolution.granularity == 0 {
            return Err(invalid_parameter(
                "resolution_granularity",
                &resolution.granularity,
                &"must be positive",
            ));
        }
        if resolution.default.0 == 0 || resolution.default.1 == 0 {
            return Err(invalid_parameter(
                "default_resolution",
                &format!("{}x{}", resolution.default.0, resolution.default.1),
                &"dimensions must be positive",
            ));
        }
        if resolution.max.0 == 0 || resolution.max.1 == 0 {
            return Err(invalid_parameter(
                "max_resolution",
                &format!("{}x{}", resolution.max.0, resolution.max.1),
                &"dimensions must be positive",
            ));
        }
        if !(self.default_strength > 0.0 && self.default_strength <= 1.0) {
            return Err(invalid_parameter(
                "default_strength",
                &self.default_strength,
                &"must be in (0, 1]",
            ));
        }
        Ok(())
    }
}
