//! File-to-file encode and decode runs.
//!
//! These glue the engine to the image and JSON loaders and are what the
//! `sh-encode` and `sh-decode` binaries call. Pixels are processed as
//! [`RgbReal`] or, with `alpha`, [`RgbaReal`].

use anyhow::Context;
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::coefficients::{decode_to_cubemap, encode, EncodeOptions, ShCoefficients};
use crate::core::{CubeFace, Pixel, RgbReal, RgbaReal};
use crate::io::{
    load_cubemap, read_coefficients, write_coefficients, write_cubemap, FileFormat, ImageScale,
};

/// Settings for turning six face images into a coefficient file.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Face images in +X, -X, +Y, -Y, +Z, -Z order.
    pub faces: [PathBuf; 6],
    pub output: PathBuf,
    pub options: EncodeOptions,
    pub alpha: bool,
    pub scale: ImageScale,
}

impl EncodeConfig {
    pub fn new(faces: [PathBuf; 6], output: PathBuf) -> Self {
        Self {
            faces,
            output,
            options: EncodeOptions::default(),
            alpha: false,
            scale: ImageScale::default(),
        }
    }
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self::new(Default::default(), PathBuf::from("coefficients.json"))
    }
}

/// Settings for rasterizing a coefficient file into six face images.
#[derive(Clone, Debug)]
pub struct DecodeConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub format: FileFormat,
    /// Edge length of each output face in texels.
    pub size: usize,
    /// Prepended to each face's file name.
    pub prefix: String,
    pub alpha: bool,
    pub scale: ImageScale,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_dir: PathBuf::from("."),
            format: FileFormat::Png,
            size: 64,
            prefix: String::new(),
            alpha: false,
            scale: ImageScale::default(),
        }
    }
}

/// Encode the faces named in `cfg` and write the coefficient file.
pub fn run_encode(cfg: &EncodeConfig) -> anyhow::Result<()> {
    if cfg.alpha {
        encode_as::<RgbaReal>(cfg)
    } else {
        encode_as::<RgbReal>(cfg)
    }
}

fn encode_as<P: Pixel>(cfg: &EncodeConfig) -> anyhow::Result<()> {
    for (face, path) in CubeFace::ALL.iter().zip(&cfg.faces) {
        info!("{face}: {}", path.display());
    }
    let cubemap = load_cubemap::<P>(&cfg.faces, cfg.scale).context("Failed to load cube map")?;
    info!(
        "Encoding {0}x{0} cube map: order {1}, method {2}, {3} samples, {4} filtering",
        cubemap.size(),
        cfg.options.order,
        cfg.options.method,
        cfg.options.samples,
        cfg.options.filtering
    );

    let start = Instant::now();
    let coefficients = encode(&cubemap, &cfg.options);
    info!(
        "Computed {} coefficients in {:.2?}",
        coefficients.len(),
        start.elapsed()
    );

    write_coefficients(&cfg.output, &coefficients)
        .with_context(|| format!("Failed to write {}", cfg.output.display()))?;
    info!("Wrote {}", cfg.output.display());
    Ok(())
}

/// Read the coefficient file named in `cfg` and write six face images.
pub fn run_decode(cfg: &DecodeConfig) -> anyhow::Result<Vec<PathBuf>> {
    if cfg.alpha {
        decode_as::<RgbaReal>(cfg)
    } else {
        decode_as::<RgbReal>(cfg)
    }
}

fn decode_as<P: Pixel>(cfg: &DecodeConfig) -> anyhow::Result<Vec<PathBuf>> {
    let coefficients: ShCoefficients<P> = read_coefficients(&cfg.input)
        .with_context(|| format!("Failed to read {}", cfg.input.display()))?;
    info!(
        "Decoding order-{} coefficients into {}x{} {} faces",
        coefficients.order(),
        cfg.size,
        cfg.size,
        cfg.format
    );

    let start = Instant::now();
    let cubemap = decode_to_cubemap::<P, P>(&coefficients, cfg.size);
    info!("Rasterized in {:.2?}", start.elapsed());

    ensure_dir(&cfg.output_dir)?;
    let written = write_cubemap(&cfg.output_dir, cfg.format, &cubemap, &cfg.prefix, cfg.scale)
        .context("Failed to write cube map")?;
    info!("Wrote {} faces to {}", written.len(), cfg.output_dir.display());
    Ok(written)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}
