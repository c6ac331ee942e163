//! Cube map faces as image files.
//!
//! Faces are stored top row first on disk and bottom row first in memory, so
//! every load and save flips vertically.
//!
//! Low dynamic range files go through an [`ImageScale`]: color channels are
//! mapped `v/255 → (v/255)^gamma · scale` on load and back on save. Alpha is
//! kept in [0, 1]. HDR files carry raw radiance both ways.

use image::{DynamicImage, ImageFormat, Rgb32FImage, RgbImage, RgbaImage};
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::core::{CubeFace, CubeMap, CubeMapError, ParseEnumError, Pixel, PixelBuffer, Real};

/// Errors raised while reading or writing face images.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to load image '{}': {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    CubeMap(#[from] CubeMapError),
}

/// Mapping between 8-bit file values and working values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageScale {
    pub gamma: Real,
    pub scale: Real,
}

impl Default for ImageScale {
    fn default() -> Self {
        Self {
            gamma: 1.0,
            scale: 255.0,
        }
    }
}

impl ImageScale {
    /// Normalized file value in [0, 1] to working value.
    pub fn expand(&self, value: Real) -> Real {
        value.powf(self.gamma) * self.scale
    }

    /// Working value to a byte, rounded and clamped.
    pub fn compress(&self, value: Real) -> u8 {
        let normalized = (value / self.scale).max(0.0).powf(1.0 / self.gamma);
        to_byte(normalized)
    }
}

fn to_byte(normalized: Real) -> u8 {
    let v = normalized * 255.0 + 0.5;
    if v.is_nan() {
        0
    } else {
        v.clamp(0.0, 255.0) as u8
    }
}

/// Output file format for decoded faces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileFormat {
    #[default]
    Png,
    Bmp,
    Tga,
    Jpg,
    Hdr,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Png => "png",
            FileFormat::Bmp => "bmp",
            FileFormat::Tga => "tga",
            FileFormat::Jpg => "jpg",
            FileFormat::Hdr => "hdr",
        }
    }

    pub fn is_hdr(self) -> bool {
        self == FileFormat::Hdr
    }

    fn image_format(self) -> ImageFormat {
        match self {
            FileFormat::Png => ImageFormat::Png,
            FileFormat::Bmp => ImageFormat::Bmp,
            FileFormat::Tga => ImageFormat::Tga,
            FileFormat::Jpg => ImageFormat::Jpeg,
            FileFormat::Hdr => ImageFormat::Hdr,
        }
    }

    /// Whether an alpha channel survives in this format.
    fn keeps_alpha(self) -> bool {
        matches!(self, FileFormat::Png | FileFormat::Bmp | FileFormat::Tga)
    }
}

impl FromStr for FileFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(FileFormat::Png),
            "bmp" => Ok(FileFormat::Bmp),
            "tga" => Ok(FileFormat::Tga),
            "jpg" => Ok(FileFormat::Jpg),
            "hdr" => Ok(FileFormat::Hdr),
            other => Err(ParseEnumError::new("image format", other, "png, bmp, tga, jpg, hdr")),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Load one face, flipped so row 0 is the bottom of the image.
pub fn load_face<P: Pixel>(path: &Path, scale: ImageScale) -> Result<PixelBuffer<P>, ImageError> {
    let img = image::open(path).map_err(|source| ImageError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let hdr = matches!(img, DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_));
    let rgba = img.flipv().into_rgba32f();
    debug!(
        "loaded {} ({}x{}, {})",
        path.display(),
        rgba.width(),
        rgba.height(),
        if hdr { "hdr" } else { "ldr" }
    );

    let width = rgba.width() as usize;
    Ok(PixelBuffer::from_fn(width, rgba.height() as usize, |row, col| {
        let texel = rgba.get_pixel(col as u32, row as u32).0;
        let mut values = [0.0; 4];
        for (c, value) in values.iter_mut().enumerate() {
            let v = texel[c] as Real;
            *value = if hdr || c == 3 { v } else { scale.expand(v) };
        }
        P::from_channels(&values[..P::CHANNELS])
    }))
}

/// Load six faces, given in +X, -X, +Y, -Y, +Z, -Z order.
pub fn load_cubemap<P: Pixel>(paths: &[PathBuf; 6], scale: ImageScale) -> Result<CubeMap<P>, ImageError> {
    let [px, nx, py, ny, pz, nz] = paths;
    let faces = [
        load_face(px, scale)?,
        load_face(nx, scale)?,
        load_face(py, scale)?,
        load_face(ny, scale)?,
        load_face(pz, scale)?,
        load_face(nz, scale)?,
    ];
    Ok(CubeMap::from_buffers(faces)?)
}

/// Path a face is written to: `<dir>/<prefix><face>.<ext>`.
pub fn face_path(dir: &Path, prefix: &str, face: CubeFace, format: FileFormat) -> PathBuf {
    dir.join(format!("{prefix}{}.{}", face.name(), format.extension()))
}

/// Write all six faces of `cubemap` into `dir`. Returns the written paths.
pub fn write_cubemap<P: Pixel>(
    dir: &Path,
    format: FileFormat,
    cubemap: &CubeMap<P>,
    prefix: &str,
    scale: ImageScale,
) -> Result<Vec<PathBuf>, ImageError> {
    let mut written = Vec::with_capacity(CubeFace::ALL.len());
    for face in CubeFace::ALL {
        let path = face_path(dir, prefix, face, format);
        let img = face_image(cubemap.face(face), format, scale);
        img.save_with_format(&path, format.image_format())
            .map_err(|source| ImageError::Write {
                path: path.clone(),
                source,
            })?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn face_image<P: Pixel>(bitmap: &PixelBuffer<P>, format: FileFormat, scale: ImageScale) -> DynamicImage {
    let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
    // Image rows run top to bottom.
    let texel = |x: u32, y: u32| bitmap.pixels()[(height - 1 - y) as usize * bitmap.width() + x as usize];

    if format.is_hdr() {
        return DynamicImage::ImageRgb32F(Rgb32FImage::from_fn(width, height, |x, y| {
            let p = texel(x, y);
            image::Rgb([p.channel(0) as f32, p.channel(1) as f32, p.channel(2) as f32])
        }));
    }

    if P::CHANNELS == 4 && format.keeps_alpha() {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            let p = texel(x, y);
            image::Rgba([
                scale.compress(p.channel(0)),
                scale.compress(p.channel(1)),
                scale.compress(p.channel(2)),
                to_byte(p.channel(3)),
            ])
        }))
    } else {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let p = texel(x, y);
            image::Rgb([
                scale.compress(p.channel(0)),
                scale.compress(p.channel(1)),
                scale.compress(p.channel(2)),
            ])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rgb, Rgba};
    use approx::assert_relative_eq;

    #[test]
    fn test_format_names() {
        for name in ["png", "bmp", "tga", "jpg", "hdr"] {
            let format: FileFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), name);
        }
        assert!("exr".parse::<FileFormat>().is_err());
        assert!(FileFormat::Hdr.is_hdr());
    }

    #[test]
    fn test_scale_maps_bytes_both_ways() {
        let scale = ImageScale::default();
        assert_relative_eq!(scale.expand(1.0), 255.0);
        assert_eq!(scale.compress(255.0), 255);
        assert_eq!(scale.compress(128.0), 128);
        assert_eq!(scale.compress(-3.0), 0);
        assert_eq!(scale.compress(1e9), 255);
        assert_eq!(scale.compress(Real::NAN), 0);

        let gamma = ImageScale { gamma: 2.2, scale: 1.0 };
        let v = gamma.expand(0.5);
        assert_eq!(gamma.compress(v), 128);
    }

    #[test]
    fn test_png_round_trip_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cubemap = CubeMap::from_texel_fn(4, |face, s, t| {
            Rgba::<f32>::new(face.index() as f32 * 40.0, ((s + 1.0) * 100.0) as f32, ((t + 1.0) * 100.0) as f32, 0.5)
        });

        let written = write_cubemap(dir.path(), FileFormat::Png, &cubemap, "sky_", ImageScale::default()).unwrap();
        assert_eq!(written.len(), 6);
        assert!(written[2].ends_with("sky_posy.png"));

        let loaded: PixelBuffer<Rgba<f32>> = load_face(&written[2], ImageScale::default()).unwrap();
        let expected = cubemap.face(CubeFace::PositiveY);
        for (a, b) in loaded.pixels().iter().zip(expected.pixels()) {
            assert!((a.r - b.r).abs() <= 1.0);
            assert!((a.g - b.g).abs() <= 1.0);
            assert!((a.b - b.b).abs() <= 1.0);
            assert!((a.a - b.a).abs() <= 1.0 / 255.0);
        }
    }

    #[test]
    fn test_hdr_keeps_raw_values() {
        let dir = tempfile::tempdir().unwrap();
        let cubemap = CubeMap::uniform(2, Rgb::<f32>::new(4.0, 2.5, 7.0));
        let written = write_cubemap(dir.path(), FileFormat::Hdr, &cubemap, "", ImageScale::default()).unwrap();

        let loaded: PixelBuffer<Rgb<f32>> = load_face(&written[0], ImageScale::default()).unwrap();
        let p = loaded.get(0, 0).unwrap();
        // RGBE shares one exponent, so precision is relative to the largest channel.
        assert_relative_eq!(p.r, 4.0, max_relative = 2e-2);
        assert_relative_eq!(p.b, 7.0, max_relative = 2e-2);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_face::<Rgb<f32>>(Path::new("/nonexistent/posx.png"), ImageScale::default()).unwrap_err();
        assert!(matches!(err, ImageError::Load { .. }));
        assert!(err.to_string().contains("/nonexistent/posx.png"));
    }
}
