//! Per-request sampling parameters

use crate::io::configuration::{DEFAULT_BLEND_HARDNESS, DEFAULT_COLORFULNESS, DEFAULT_NOISE_Q};
use crate::io::error::{Result, invalid_parameter};

/// Parameters controlling mask strength and noise shaping for one request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    /// Requested output width; taken from the input image when unset
    pub width: Option<u32>,
    /// Requested output height; taken from the input image when unset
    pub height: Option<u32>,
    /// Overrides the mask's maximum opacity when positive (0..=1)
    pub strength: f64,
    /// Noise falloff; higher values give larger, smoother features (> 0)
    pub noise_q: f64,
    /// Hardness of the colour matching mask (>= 0)
    pub blend_hardness: f64,
    /// Colour kept in the base noise before shaping (0..=1)
    pub colorfulness: f64,
    /// Seed for the noise generator; drawn from the OS when unset
    pub seed: Option<u64>,
    /// Emit intermediate arrays to the attached observer
    pub debug: bool,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            strength: 0.0,
            noise_q: DEFAULT_NOISE_Q,
            blend_hardness: DEFAULT_BLEND_HARDNESS,
            colorfulness: DEFAULT_COLORFULNESS,
            seed: None,
            debug: false,
        }
    }
}

impl SampleParams {
    /// Check every parameter against its valid range
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `strength` is outside [0, 1]
    /// - `noise_q` is not strictly positive
    /// - `blend_hardness` is negative
    /// - `colorfulness` is outside [0, 1]
    /// - A requested width or height is zero
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(invalid_parameter(
                "strength",
                &self.strength,
                &"must be in [0, 1]",
            ));
        }
        if !(self.noise_q > 0.0 && self.noise_q.is_finite()) {
            return Err(invalid_parameter(
                "noise_q",
                &self.noise_q,
                &"must be a finite positive number",
            ));
        }
        if !(self.blend_hardness >= 0.0 && self.blend_hardness.is_finite()) {
            return Err(invalid_parameter(
                "blend_hardness",
                &self.blend_hardness,
                &"must be a finite non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&self.colorfulness) {
            return Err(invalid_parameter(
                "colorfulness",
                &self.colorfulness,
                &"must be in [0, 1]",
            ));
        }
        if self.width == Some(0) {
            return Err(invalid_parameter("width", &0, &"must be positive"));
        }
        if self.height == Some(0) {
            return Err(invalid_parameter("height", &0, &"must be positive"));
        }
        Ok(())
    }
}
