//! sh-decode: Rasterize spherical harmonics coefficients into a cube map
//!
//! Usage:
//!   sh-decode -i coefficients.json -o out/ [--format png] [--size 64] [--prefix sky_]

use clap::Parser;
use sh_cubemap::io::{FileFormat, ImageScale};
use sh_cubemap::pipeline::{run_decode, DecodeConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Decode spherical harmonics coefficients into cube map faces")]
struct Args {
    /// Input JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Face image format: png, bmp, tga, jpg or hdr
    #[arg(long, default_value = "png")]
    format: FileFormat,

    /// Face edge length in pixels
    #[arg(long, default_value_t = 64)]
    size: usize,

    /// Prepended to every face file name
    #[arg(long, default_value = "")]
    prefix: String,

    /// Decode the alpha channel too
    #[arg(long)]
    alpha: bool,

    /// Gamma applied to 8-bit outputs
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Scale applied to 8-bit outputs
    #[arg(long, default_value_t = 255.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("sh-decode v{}", sh_cubemap::VERSION);

    let cfg = DecodeConfig {
        input: args.input,
        output_dir: args.output,
        format: args.format,
        size: args.size,
        prefix: args.prefix,
        alpha: args.alpha,
        scale: ImageScale {
            gamma: args.gamma,
            scale: args.scale,
        },
    };
    run_decode(&cfg)?;
    Ok(())
}
