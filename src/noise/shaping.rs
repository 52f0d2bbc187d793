//! Spectrally shaped, colour matched noise for erased regions
//!
//! The kept part of the source is convolved with an oscillating kernel whose
//! amplitude is random noise. The Fourier transform of the kept source encodes the
//! scale, orientation and placement of its features, so the convolution produces
//! noise sharing those statistics. The noise is then pulled toward the source
//! palette in HSV space and composited into the erased region under the blend mask.

use crate::io::configuration::{NOISE_FALLOFF_BASE, NOISE_MAGNITUDE, OSCILLATOR_STD};
use crate::io::error::{FillError, Result, shape_mismatch};
use crate::mask::blend::has_erased_region;
use crate::math::channels::{RGB_CHANNELS, rgb_to_grey};
use crate::math::colorspace::hsv_blend_image;
use crate::noise::hsv_mask::hsv_blend_mask;
use crate::pipeline::observer::ArtifactObserver;
use crate::pipeline::params::SampleParams;
use crate::spectral::kernel::gaussian_kernel;
use crate::spectral::transform::{convolve, to_complex};
use ndarray::{Array3, Axis, Ix3, Zip};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rustfft::num_complex::Complex64;
use std::f64::consts::TAU;

/// Seeded generator of shaped noise for one request
pub struct NoiseShaper {
    noise_q: f64,
    blend_hardness: f64,
    colorfulness: f64,
    rng: StdRng,
}

impl NoiseShaper {
    /// Create a shaper from validated sampling parameters
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation (notably `noise_q <= 0`)
    pub fn new(params: &SampleParams) -> Result<Self> {
        params.validate()?;
        let rng = params
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Ok(Self {
            noise_q: params.noise_q,
            blend_hardness: params.blend_hardness,
            colorfulness: params.colorfulness,
            rng,
        })
    }

    /// Fill the erased region of `source` with shaped noise
    ///
    /// Pixels where `blend_mask` is zero come back unchanged; where it is one they
    /// are entirely replaced. A mask with no erased pixel returns the (clipped)
    /// source without drawing any noise.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `source` and `blend_mask` are not 3-channel arrays of the same shape
    /// - The blend mask leaves no kept pixel to derive noise from
    /// - The blend mask has no transition zone to build the colour matching mask from
    pub fn shape(
        &mut self,
        source: &Array3<f64>,
        blend_mask: &Array3<f64>,
        observer: &mut dyn ArtifactObserver,
    ) -> Result<Array3<f64>> {
        check_rgb_pair("NoiseShaper::shape", source, blend_mask)?;

        if !has_erased_region(blend_mask) {
            return Ok(source.mapv(|value| value.clamp(0.0, 1.0)));
        }
        if blend_mask.iter().all(|&value| value >= 1.0) {
            return Err(FillError::InvalidSourceData {
                reason: "blend mask erases every pixel, no source left to shape noise from"
                    .to_string(),
            });
        }

        let windowed = source * &blend_mask.mapv(|value| 1.0 - value);
        observer.observe("windowed_source", windowed.view());

        let shaped = self.shaped_noise(&windowed)?;
        observer.observe("shaped_noise", shaped.view());

        let hsv_mask = hsv_blend_mask(blend_mask, self.blend_hardness)?;
        observer.observe("hsv_blend_mask", hsv_mask.view());

        let matched = hsv_blend_image(&shaped, source, Some(&hsv_mask))?;
        observer.observe("shaped_noise_post_hsv_blend", matched.view());

        let seeded = composite(source, &matched, blend_mask)?;
        observer.observe("shaped_noise_post_final_blend", seeded.view());

        Ok(seeded)
    }

    /// Convolve the windowed source with a noise-modulated oscillating kernel
    ///
    /// # Errors
    ///
    /// Returns an error if `windowed` is not a 3-channel array
    pub fn shaped_noise(&mut self, windowed: &Array3<f64>) -> Result<Array3<f64>> {
        let (rows, cols, channels) = windowed.dim();
        if channels != RGB_CHANNELS {
            return Err(shape_mismatch(
                "shaped_noise",
                &[rows, cols, RGB_CHANNELS],
                windowed.shape(),
            ));
        }

        // Grey noise is a single plane, broadcast across channels by the convolution
        let noise_channels = if self.colorfulness > 0.0 { RGB_CHANNELS } else { 1 };
        let noise = desaturate(&self.base_noise(rows, cols, noise_channels), self.colorfulness);

        let oscillator = gaussian_kernel(rows, cols, Complex64::new(0.0, OSCILLATOR_STD), false);
        let mut kernel = to_complex(&noise);
        Zip::from(kernel.lanes_mut(Axis(2)))
            .and(&oscillator)
            .for_each(|mut lane, &wave| lane.mapv_inplace(|value| value * wave));

        let kernel = if noise_channels == 1 {
            kernel.index_axis_move(Axis(2), 0).into_dyn()
        } else {
            kernel.into_dyn()
        };

        let shaped = convolve(kernel.view(), to_complex(windowed).into_dyn().view())?;
        Ok(shaped.mapv(|value| value.norm()).into_dimensionality::<Ix3>()?)
    }

    /// Real part of random-phase noise with magnitude `25 * u^(50 * noise_q)`
    ///
    /// The magnitude exponent pushes most of the energy toward zero; higher
    /// `noise_q` concentrates it further and yields smoother shaped noise.
    pub fn base_noise(&mut self, rows: usize, cols: usize, channels: usize) -> Array3<f64> {
        let shape = (rows, cols, channels);
        let phase = Array3::from_shape_simple_fn(shape, || self.rng.random::<f64>());
        let falloff = NOISE_FALLOFF_BASE * self.noise_q;
        let magnitude =
            Array3::from_shape_simple_fn(shape, || self.rng.random::<f64>().powf(falloff));

        let mut noise = phase.mapv(|turn| NOISE_MAGNITUDE * (TAU * turn).cos());
        noise *= &magnitude;
        noise
    }
}

/// Blend noise toward its own greyscale projection
///
/// `colorfulness` of zero gives pure grey noise, one leaves the noise untouched.
pub fn desaturate(noise: &Array3<f64>, colorfulness: f64) -> Array3<f64> {
    let lifted = noise.mapv(|value| value + 0.5);
    let grey = rgb_to_grey(&lifted);
    let mut desaturated = lifted * colorfulness;
    Zip::from(desaturated.lanes_mut(Axis(2)))
        .and(&grey)
        .for_each(|mut lane, &luma| {
            lane.mapv_inplace(|value| luma.mul_add(1.0 - colorfulness, value) - 0.5);
        });
    desaturated
}

/// Place `noise` into `source` under `blend_mask`, clipped to [0, 1]
///
/// # Errors
///
/// Returns an error if the three arrays do not share a 3-channel shape
pub fn composite(
    source: &Array3<f64>,
    noise: &Array3<f64>,
    blend_mask: &Array3<f64>,
) -> Result<Array3<f64>> {
    check_rgb_pair("composite", source, blend_mask)?;
    if noise.shape() != source.shape() {
        return Err(shape_mismatch("composite", source.shape(), noise.shape()));
    }

    let mut seeded = Array3::<f64>::zeros(source.raw_dim());
    Zip::from(&mut seeded)
        .and(source)
        .and(noise)
        .and(blend_mask)
        .for_each(|out, &kept, &synthesized, &weight| {
            *out = kept
                .mul_add(1.0 - weight, synthesized * weight)
                .clamp(0.0, 1.0);
        });
    Ok(seeded)
}

fn check_rgb_pair(operation: &'static str, image: &Array3<f64>, mask: &Array3<f64>) -> Result<()> {
    let (rows, cols, channels) = image.dim();
    if channels != RGB_CHANNELS {
        return Err(shape_mismatch(operation, &[rows, cols, RGB_CHANNELS], image.shape()));
    }
    if mask.shape() != image.shape() {
        return Err(shape_mismatch(operation, image.shape(), mask.shape()));
    }
    Ok(())
}
