//! # sh-cubemap: Spherical Harmonics for Cube Maps
//!
//! This crate projects environment cube maps onto a real spherical harmonics
//! basis and reconstructs cube maps from the resulting coefficients. Low-order
//! expansions are a compact stand-in for diffuse lighting.
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - `core`: Pixels, pixel buffers, cube maps and face geometry, SH basis math
//! - `sampling`: Directional cube map sampling and the projection integrators
//! - `coefficients`: SH coefficient vectors, encode and decode
//! - `io`: Face images and JSON coefficient files
//! - `pipeline`: File-to-file runs used by the `sh-encode` and `sh-decode` binaries
//!
//! ## Conventions
//!
//! Directions use `x = sin θ sin φ`, `y = cos θ`, `z = sin θ cos φ`, with
//! φ ∈ [0, 2π) and θ ∈ [0, π]. Coefficient (l, m) lives at index `l·(l+1) + m`.

// Core data structures and math
pub mod core;

// Cube map sampling and integration
pub mod sampling;

// SH coefficients, encoder and decoder
pub mod coefficients;

// I/O operations (images, JSON)
pub mod io;

// Encode/decode runs over files
pub mod pipeline;

// Re-export commonly used types at crate root for convenience
pub use self::coefficients::{decode, decode_to_cubemap, encode, EncodeOptions, ShCoefficients};
pub use self::core::{CubeFace, CubeMap, Pixel, PixelBuffer, Rgb, Rgba};
pub use self::sampling::{Filtering, SamplingMethod};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
