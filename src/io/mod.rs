//! I/O operations for loading and saving data.
//!
//! This module handles all file format parsing and export:
//! - Cube map faces as PNG/BMP/TGA/JPG/HDR images
//! - SH coefficients as JSON

mod coefficients;
mod image;

// Re-export public types and functions
pub use self::coefficients::{
    from_json_str, read_coefficients, to_json_string, write_coefficients, CoefficientFileError,
};
pub use self::image::{
    face_path, load_cubemap, load_face, write_cubemap, FileFormat, ImageError, ImageScale,
};
