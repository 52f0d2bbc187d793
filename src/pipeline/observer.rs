//! Observation of named intermediate arrays
//!
//! The seeding pipeline reports each major intermediate (masks, windowed source,
//! noise at every shaping stage) to an observer. Observers only look; nothing they
//! do feeds back into the computation.

use ndarray::{Array3, ArrayView3};

/// Receives intermediate arrays by name as the pipeline produces them
pub trait ArtifactObserver {
    /// Called once per artifact, in pipeline order
    fn observe(&mut self, name: &str, artifact: ArrayView3<'_, f64>);
}

/// Observer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ArtifactObserver for NoopObserver {
    fn observe(&mut self, _name: &str, _artifact: ArrayView3<'_, f64>) {}
}

/// Keeps a copy of every observed artifact in memory
#[derive(Debug, Default, Clone)]
pub struct ArtifactCapture {
    artifacts: Vec<(String, Array3<f64>)>,
}

impl ArtifactCapture {
    /// Create an empty capture
    pub const fn new() -> Self {
        Self {
            artifacts: Vec::new(),
        }
    }

    /// Names of captured artifacts in the order they were observed
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Most recent artifact recorded under `name`
    pub fn get(&self, name: &str) -> Option<&Array3<f64>> {
        self.artifacts
            .iter()
            .rev()
            .find(|(captured, _)| captured == name)
            .map(|(_, artifact)| artifact)
    }

    /// Number of captured artifacts
    pub const fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// True when nothing has been captured
    pub const fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactObserver for ArtifactCapture {
    fn observe(&mut self, name: &str, artifact: ArrayView3<'_, f64>) {
        self.artifacts.push((name.to_string(), artifact.to_owned()));
    }
}
