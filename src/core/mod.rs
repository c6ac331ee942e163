//! Core data structures and mathematical operations.
//!
//! This module contains the fundamental types used throughout the crate:
//! - `Pixel`, `Rgb`, `Rgba`: pixel values over byte or float channels
//! - `PixelBuffer`: bounds-checked 2D images
//! - `CubeMap`, `CubeFace`: six faces plus the face geometry
//! - SH basis evaluation and spherical coordinate helpers
//!
//! All types here are "pure data" - no I/O, no sampling policy.

pub mod cubemap;
pub mod math;
pub mod pixel;
pub mod pixel_buffer;
pub mod sh;

use thiserror::Error;

// Re-export public types
pub use cubemap::{texel_center, CubeFace, CubeMap, CubeMapError};
pub use math::{Real, Spherical};
pub use pixel::{Channel, Pixel, Rgb, Rgb32F, Rgb8, RgbReal, Rgba, Rgba32F, RgbaReal};
pub use pixel_buffer::{PixelBuffer, PixelError};
pub use sh::{coefficient_count, sh_basis, sh_index};

/// A name given at a boundary (CLI flag, config) did not match any variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}
