//! Channel and colour space helpers for RGB arrays

/// Greyscale and RGB channel conversion
pub mod channels;
/// RGB/HSV conversion and masked HSV blending
pub mod colorspace;
