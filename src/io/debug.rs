//! Debug sink writing each observed artifact as a PNG

use crate::io::error::Result;
use crate::io::image::{array_to_rgb, save_rgb};
use crate::pipeline::observer::ArtifactObserver;
use ndarray::ArrayView3;
use std::path::{Path, PathBuf};

/// Writes `<dir>/<name>.png` for every artifact it observes
///
/// Artifacts are written as `clip(|x| * 255)`. Write failures are logged and
/// otherwise ignored so debugging never changes the outcome of a request.
#[derive(Debug, Clone)]
pub struct DebugImageSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DebugImageSink {
    /// Create a sink writing into `dir`, created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Directory artifacts are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&self, name: &str, artifact: ArrayView3<'_, f64>) -> Result<PathBuf> {
        let path = self.dir.join(format!("{name}.png"));
        let magnitude = artifact.mapv(f64::abs);
        save_rgb(&array_to_rgb(&magnitude)?, &path)?;
        Ok(path)
    }
}

impl ArtifactObserver for DebugImageSink {
    fn observe(&mut self, name: &str, artifact: ArrayView3<'_, f64>) {
        match self.write(name, artifact) {
            Ok(path) => {
                tracing::debug!("Wrote debug artifact {}", path.display());
                self.written.push(path);
            }
            Err(err) => tracing::warn!("Could not write debug artifact '{name}': {err}"),
        }
    }
}
