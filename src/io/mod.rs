//! File handling, configuration, errors and the command-line front end

/// Command-line parsing and batch file processing
pub mod cli;
/// Calibrated constants and runtime settings
pub mod configuration;
/// PNG sink for intermediate arrays
pub mod debug;
/// Error types and constructors
pub mod error;
/// Image decoding, array conversion, resizing and export
pub mod image;
/// Batch progress display
pub mod progress;
