//! Request-level entry point turning an input image into a seed image and mask
//!
//! The path is chosen by alpha presence alone. Images with an alpha channel are
//! inpainted: alpha becomes the raw mask, the blend mask is built from it and the
//! erased region is filled with shaped noise. Opaque images are used as a reference
//! as-is under a uniform mask derived from the strength.

use crate::io::configuration::Settings;
use crate::io::error::Result;
use crate::io::image::{alpha_to_mask, array_to_rgb, resize_to, rgb_to_array};
use crate::mask::blend::{build_blend_mask, erased_fraction, uniform_mask};
use crate::noise::NoiseShaper;
use crate::pipeline::observer::{ArtifactObserver, NoopObserver};
use crate::pipeline::params::SampleParams;
use crate::pipeline::resolution::{Resolution, valid_resolution};
use image::{DynamicImage, RgbImage};
use ndarray::Array3;
use std::fmt;
use std::time::Instant;

/// How the generator should treat the prepared seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedMode {
    /// Erased pixels were filled with shaped noise and must be regenerated
    Inpaint,
    /// The whole image is a reference, weighted by a uniform mask
    Img2Img,
}

impl fmt::Display for SeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inpaint => write!(f, "inpaint"),
            Self::Img2Img => write!(f, "img2img"),
        }
    }
}

/// Seed image and mask ready to hand to the generator
#[derive(Clone, Debug)]
pub struct PreparedSeed {
    /// Source with erased pixels filled, at the chosen resolution
    pub seed_image: RgbImage,
    /// Blend mask at the same resolution, 255 where the generator has full freedom
    pub mask_image: RgbImage,
    /// Resolution both images were produced at
    pub resolution: Resolution,
    /// Path the request took
    pub mode: SeedMode,
    /// Strength actually applied, after any fallback substitution
    pub strength: f64,
}

/// Prepares seed images under a fixed set of settings
#[derive(Clone, Copy, Debug)]
pub struct Orchestrator {
    settings: Settings,
}

impl Orchestrator {
    /// Create an orchestrator after validating `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Settings this orchestrator was built with
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolution a request for `image` would be produced at
    pub fn target_resolution(&self, image: &DynamicImage, params: &SampleParams) -> Resolution {
        valid_resolution(
            params.width,
            params.height,
            Some(Resolution::new(image.width(), image.height())),
            &self.settings.resolution,
        )
    }

    /// Resize `image`, build its mask and seed any erased region
    ///
    /// Intermediate arrays go to `observer` only when `params.debug` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parameters fail validation
    /// - The alpha channel erases the whole image at full opacity
    /// - A mask or noise stage fails
    pub fn prepare(
        &self,
        image: &DynamicImage,
        params: &SampleParams,
        observer: &mut dyn ArtifactObserver,
    ) -> Result<PreparedSeed> {
        params.validate()?;

        let mut silent = NoopObserver;
        let observer: &mut dyn ArtifactObserver = if params.debug {
            observer
        } else {
            &mut silent
        };

        let resolution = self.target_resolution(image, params);
        if image.width() != resolution.width || image.height() != resolution.height {
            tracing::info!(
                "Resizing {}x{} to {}x{}",
                image.width(),
                image.height(),
                resolution.width,
                resolution.height
            );
        }
        let resized = resize_to(image, resolution);
        let source = rgb_to_array(&resized)?;

        let prepared = match alpha_to_mask(&resized)? {
            Some(raw_mask) => Self::inpaint(&source, &raw_mask, resolution, params, observer)?,
            None => self.reference(&source, resolution, params, observer)?,
        };

        // Reference mode reports its fallback strength here too
        if prepared.strength > 0.0 {
            tracing::info!(
                "Overriding mask maximum opacity with strength {}",
                prepared.strength
            );
        }
        Ok(prepared)
    }

    fn inpaint(
        source: &Array3<f64>,
        raw_mask: &Array3<f64>,
        resolution: Resolution,
        params: &SampleParams,
        observer: &mut dyn ArtifactObserver,
    ) -> Result<PreparedSeed> {
        if !raw_mask.iter().any(|&alpha| alpha <= 0.0) {
            tracing::warn!("Image has no fully transparent area; the mask may have little effect");
        }
        if !raw_mask.iter().any(|&alpha| alpha >= 1.0) {
            tracing::warn!("Image has no fully opaque area; there is little source to match");
        }
        observer.observe("raw_mask", raw_mask.view());

        let started = Instant::now();
        let blend_mask = build_blend_mask(raw_mask, params.strength)?;
        tracing::debug!(
            "Blend mask built in {:?}, {:.1}% of pixels mostly erased",
            started.elapsed(),
            erased_fraction(&blend_mask, 0.5) * 100.0
        );
        observer.observe("blend_mask", blend_mask.view());

        let started = Instant::now();
        let mut shaper = NoiseShaper::new(params)?;
        let seeded = shaper.shape(source, &blend_mask, observer)?;
        tracing::debug!("Noise shaped in {:?}", started.elapsed());

        Ok(PreparedSeed {
            seed_image: array_to_rgb(&seeded)?,
            mask_image: array_to_rgb(&blend_mask)?,
            resolution,
            mode: SeedMode::Inpaint,
            strength: params.strength,
        })
    }

    fn reference(
        &self,
        source: &Array3<f64>,
        resolution: Resolution,
        params: &SampleParams,
        observer: &mut dyn ArtifactObserver,
    ) -> Result<PreparedSeed> {
        let strength = if params.strength > 0.0 {
            params.strength
        } else {
            self.settings.default_strength
        };
        let (rows, cols, _) = source.dim();
        let blend_mask = uniform_mask(rows, cols, strength);
        observer.observe("blend_mask", blend_mask.view());

        Ok(PreparedSeed {
            seed_image: array_to_rgb(source)?,
            mask_image: array_to_rgb(&blend_mask)?,
            resolution,
            mode: SeedMode::Img2Img,
            strength,
        })
    }
}
