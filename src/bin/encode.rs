//! sh-encode: Project a cube map onto spherical harmonics
//!
//! Usage:
//!   sh-encode --px posx.png --nx negx.png --py posy.png --ny negy.png \
//!             --pz posz.png --nz negz.png -o coefficients.json [--order 2] [--method cubemap]

use clap::Parser;
use sh_cubemap::coefficients::EncodeOptions;
use sh_cubemap::io::ImageScale;
use sh_cubemap::pipeline::{run_encode, EncodeConfig};
use sh_cubemap::sampling::{Filtering, SamplingMethod};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Encode a cube map into spherical harmonics coefficients")]
struct Args {
    /// Positive X face
    #[arg(long)]
    px: PathBuf,
    /// Negative X face
    #[arg(long)]
    nx: PathBuf,
    /// Positive Y face
    #[arg(long)]
    py: PathBuf,
    /// Negative Y face
    #[arg(long)]
    ny: PathBuf,
    /// Positive Z face
    #[arg(long)]
    pz: PathBuf,
    /// Negative Z face
    #[arg(long)]
    nz: PathBuf,

    /// Output JSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Highest SH band (0 and up)
    #[arg(long, default_value_t = 2)]
    order: u32,

    /// Sample budget for the spherical and monte-carlo methods
    #[arg(long, default_value_t = 64)]
    samples: u32,

    /// Integration method: spherical, monte-carlo or cubemap
    #[arg(long, default_value = "monte-carlo")]
    method: SamplingMethod,

    /// Face filtering: linear or nearest
    #[arg(long, default_value = "linear")]
    filtering: Filtering,

    /// Encode the alpha channel too
    #[arg(long)]
    alpha: bool,

    /// Gamma applied to 8-bit inputs
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Scale applied to 8-bit inputs
    #[arg(long, default_value_t = 255.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("sh-encode v{}", sh_cubemap::VERSION);

    let cfg = EncodeConfig {
        faces: [args.px, args.nx, args.py, args.ny, args.pz, args.nz],
        output: args.output,
        options: EncodeOptions {
            order: args.order,
            method: args.method,
            samples: args.samples,
            filtering: args.filtering,
        },
        alpha: args.alpha,
        scale: ImageScale {
            gamma: args.gamma,
            scale: args.scale,
        },
    };
    run_encode(&cfg)
}
