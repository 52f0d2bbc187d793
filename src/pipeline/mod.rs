//! Request handling from sampling parameters to the prepared seed

/// Observation of named intermediate arrays
pub mod observer;
/// Resize, mask selection and noise seeding for one request
pub mod orchestrator;
/// Per-request sampling parameters
pub mod params;
/// Output resolution clamping and rounding
pub mod resolution;

pub use orchestrator::{Orchestrator, PreparedSeed, SeedMode};
pub use params::SampleParams;
pub use resolution::{Resolution, valid_resolution};
