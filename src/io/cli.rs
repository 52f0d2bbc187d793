//! Command-line interface for batch seeding of image files

use crate::io::configuration::{
    ACCEPTED_EXTENSIONS, DEBUG_DIR_SUFFIX, DEFAULT_BLEND_HARDNESS, DEFAULT_COLORFULNESS,
    DEFAULT_NOISE_Q, MASK_SUFFIX, MAX_RESOLUTION, SEED_SUFFIX, Settings,
};
use crate::io::debug::DebugImageSink;
use crate::io::error::{Result, invalid_path};
use crate::io::image::{load_image, save_rgb};
use crate::io::progress::ProgressManager;
use crate::pipeline::observer::{ArtifactObserver, NoopObserver};
use crate::pipeline::{Orchestrator, SampleParams};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "spectralfill")]
#[command(
    author,
    version,
    about = "Seed erased image regions with spectrally shaped noise"
)]
/// Command-line arguments for the seeding tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image (png, jpg, jpeg) or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output width in pixels (taken from the input when omitted)
    #[arg(short = 'w', long)]
    pub width: Option<u32>,

    /// Output height in pixels (taken from the input when omitted)
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Mask strength in [0, 1]; overrides the mask's maximum opacity when positive
    #[arg(short, long, default_value_t = 0.0)]
    pub strength: f64,

    /// Noise falloff; higher values give larger, smoother features
    #[arg(long, default_value_t = DEFAULT_NOISE_Q)]
    pub noise_q: f64,

    /// Hardness of the colour matching mask
    #[arg(short, long, default_value_t = DEFAULT_BLEND_HARDNESS)]
    pub blend: f64,

    /// Colour kept in the base noise, 0 for grey noise
    #[arg(short, long, default_value_t = DEFAULT_COLORFULNESS)]
    pub color: f64,

    /// Random seed for reproducible noise
    #[arg(long)]
    pub seed: Option<u64>,

    /// Largest output width
    #[arg(long, default_value_t = MAX_RESOLUTION.0)]
    pub max_width: u32,

    /// Largest output height
    #[arg(long, default_value_t = MAX_RESOLUTION.1)]
    pub max_height: u32,

    /// Write intermediate arrays as PNG into <input>_debug/
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default settings with the maximum resolution taken from the arguments
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.resolution.max = (self.max_width, self.max_height);
        settings
    }

    /// Sampling parameters built from the arguments
    pub const fn sample_params(&self) -> SampleParams {
        SampleParams {
            width: self.width,
            height: self.height,
            strength: self.strength,
            noise_q: self.noise_q,
            blend_hardness: self.blend,
            colorfulness: self.color,
            seed: self.seed,
            debug: self.debug,
        }
    }
}

/// Orchestrates batch processing of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    orchestrator: Orchestrator,
    progress_manager: ProgressManager,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the sampling parameters or settings are invalid
    pub fn new(cli: Cli) -> Result<Self> {
        cli.sample_params().validate()?;
        let orchestrator = Orchestrator::new(cli.settings())?;
        let progress_manager = if cli.should_show_progress() {
            ProgressManager::new()
        } else {
            ProgressManager::hidden()
        };

        Ok(Self {
            cli,
            orchestrator,
            progress_manager,
        })
    }

    /// Process files according to CLI arguments, returning how many were written
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<usize> {
        let files = self.collect_files()?;

        if files.is_empty() {
            tracing::info!("Nothing to process in {}", self.cli.target.display());
            return Ok(0);
        }

        self.progress_manager.initialize(files.len());
        for file in &files {
            self.process_file(file)?;
        }
        self.progress_manager.finish();

        Ok(self.progress_manager.completed())
    }

    /// Files the processor would handle for the current target
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target is a file with an unsupported extension
    /// - The target does not exist
    /// - The target directory cannot be read
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;
        if target.is_file() {
            if !is_accepted_image(target) {
                return Err(invalid_path(target, &"must be a png, jpg or jpeg image"));
            }
            Ok(self
                .should_process_file(target)
                .then(|| target.clone())
                .into_iter()
                .collect())
        } else if target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(target)? {
                let path = entry?.path();
                if path.is_file()
                    && is_accepted_image(&path)
                    && !is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_path(target, &"must be an image file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        if seed_output_path(input_path).exists() {
            tracing::info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path) -> Result<()> {
        let start_time = Instant::now();
        self.progress_manager.start_file(input_path);

        let image = load_image(input_path)?;
        let params = self.cli.sample_params();

        let mut sink;
        let mut silent = NoopObserver;
        let observer: &mut dyn ArtifactObserver = if params.debug {
            sink = DebugImageSink::new(debug_dir_path(input_path));
            &mut sink
        } else {
            &mut silent
        };

        let prepared = self.orchestrator.prepare(&image, &params, observer)?;
        save_rgb(&prepared.seed_image, &seed_output_path(input_path))?;
        save_rgb(&prepared.mask_image, &mask_output_path(input_path))?;

        tracing::info!(
            "{}: {} seed at {}x{} (strength {}) in {:?}",
            input_path.display(),
            prepared.mode,
            prepared.resolution.width,
            prepared.resolution.height,
            prepared.strength,
            start_time.elapsed()
        );
        self.progress_manager.complete_file();
        Ok(())
    }
}

fn is_accepted_image(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| extension.eq_ignore_ascii_case(accepted))
        })
}

fn is_generated_output(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .is_some_and(|stem| stem.ends_with(SEED_SUFFIX) || stem.ends_with(MASK_SUFFIX))
}

fn sibling_path(input_path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}{extension}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Path the seed image for `input_path` is written to
pub fn seed_output_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, SEED_SUFFIX, ".png")
}

/// Path the mask image for `input_path` is written to
pub fn mask_output_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, MASK_SUFFIX, ".png")
}

/// Directory debug artifacts for `input_path` are written to
pub fn debug_dir_path(input_path: &Path) -> PathBuf {
    sibling_path(input_path, DEBUG_DIR_SUFFIX, "")
}
