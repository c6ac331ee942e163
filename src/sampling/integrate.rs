//! Numerical estimation of SH projection integrals.
//!
//! Each estimator approximates `∫ f(ω)·y(l,m,ω) dω` over the unit sphere:
//!
//! - [`SphericalQuadrature`]: midpoint rule on a regular (φ, θ) grid, with the
//!   `sin θ` Jacobian.
//! - [`MonteCarlo`]: Hammersley points mapped uniformly onto the sphere,
//!   weighted `4π / N`.
//! - [`CubemapTexels`]: every texel of a cube map, weighted by its exact
//!   solid angle. The most accurate of the three, and O(6·W·H) per call.
//!
//! Sums are accumulated in [`Pixel::Float`] of the sampled values.

use std::fmt;
use std::str::FromStr;

use super::PolarFunction;
use crate::core::math::{hammersley, sample_sphere, texel_solid_angle, FOUR_PI, TWO_PI};
use crate::core::{sh_basis, texel_center, CubeFace, CubeMap, ParseEnumError, Pixel, Real, Spherical};
use std::f64::consts::PI;

/// Strategy used to estimate SH coefficients.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingMethod {
    /// Regular grid quadrature over (φ, θ).
    Spherical,
    /// Quasi-Monte-Carlo over a Hammersley point set.
    #[default]
    MonteCarlo,
    /// Exact per-texel integration over the source cube map.
    Cubemap,
}

impl FromStr for SamplingMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spherical" => Ok(SamplingMethod::Spherical),
            "monte-carlo" => Ok(SamplingMethod::MonteCarlo),
            "cubemap" => Ok(SamplingMethod::Cubemap),
            other => Err(ParseEnumError::new(
                "sampling method",
                other,
                "spherical, monte-carlo, cubemap",
            )),
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SamplingMethod::Spherical => "spherical",
            SamplingMethod::MonteCarlo => "monte-carlo",
            SamplingMethod::Cubemap => "cubemap",
        };
        f.write_str(name)
    }
}

/// Something that can estimate the projection onto basis function (l, m).
pub trait Estimator<P>: Sync {
    fn estimate(&self, l: u32, m: i32) -> P;
}

/// Accumulator type of an estimator over `F`.
type Accum<F> = <<F as PolarFunction>::Output as Pixel>::Float;

/// Grid resolution of the quadrature for a requested sample budget:
/// `floor(sqrt(2·samples))`, at least 2.
pub fn quadrature_divisions(samples: u32) -> u32 {
    ((2.0 * samples as Real).sqrt().floor() as u32).max(2)
}

/// Midpoint quadrature on a `divisions × divisions/2` grid in (φ, θ).
pub struct SphericalQuadrature<'f, F> {
    function: &'f F,
    divisions: u32,
}

impl<'f, F> SphericalQuadrature<'f, F> {
    pub fn new(function: &'f F, divisions: u32) -> Self {
        Self {
            function,
            divisions: divisions.max(2),
        }
    }

    /// Grid sized from a sample budget, see [`quadrature_divisions`].
    pub fn with_samples(function: &'f F, samples: u32) -> Self {
        Self::new(function, quadrature_divisions(samples))
    }

    pub fn divisions(&self) -> u32 {
        self.divisions
    }
}

impl<F: PolarFunction> Estimator<Accum<F>> for SphericalQuadrature<'_, F> {
    fn estimate(&self, l: u32, m: i32) -> Accum<F> {
        let phi_steps = self.divisions;
        let theta_steps = self.divisions / 2;
        let d_phi = TWO_PI / phi_steps as Real;
        // θ spans [0, π] in divisions/2 cells.
        let d_theta = PI / theta_steps as Real;
        let cell = d_phi * d_theta;

        let mut estimation = <Accum<F> as Pixel>::zero();
        for i in 0..phi_steps {
            let phi = (i as Real + 0.5) * d_phi;
            for j in 0..theta_steps {
                let theta = (j as Real + 0.5) * d_theta;
                let weight = sh_basis(l, m, phi, theta) * theta.sin() * cell;
                estimation += self.function.eval(phi, theta).convert::<Accum<F>>() * weight;
            }
        }
        estimation
    }
}

/// Quasi-Monte-Carlo estimator over `samples` Hammersley points.
pub struct MonteCarlo<'f, F> {
    function: &'f F,
    samples: u32,
}

impl<'f, F> MonteCarlo<'f, F> {
    pub fn new(function: &'f F, samples: u32) -> Self {
        Self {
            function,
            samples: samples.max(1),
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }
}

impl<F: PolarFunction> Estimator<Accum<F>> for MonteCarlo<'_, F> {
    fn estimate(&self, l: u32, m: i32) -> Accum<F> {
        let mut estimation = <Accum<F> as Pixel>::zero();
        for i in 0..self.samples {
            let (ex, ey) = hammersley(i, self.samples);
            let Spherical { phi, theta } = sample_sphere(ex, ey);
            let value: Accum<F> = self.function.eval(phi, theta).convert();
            estimation += value * sh_basis(l, m, phi, theta);
        }
        estimation * (FOUR_PI / self.samples as Real)
    }
}

/// Integrates directly over the texels of a cube map.
///
/// Texel values are used as-is (no filtering); each one is weighted by the
/// solid angle it subtends, so a constant map integrates exactly.
pub struct CubemapTexels<'c, P> {
    cubemap: &'c CubeMap<P>,
}

impl<'c, P: Pixel> CubemapTexels<'c, P> {
    pub fn new(cubemap: &'c CubeMap<P>) -> Self {
        Self { cubemap }
    }
}

impl<P: Pixel> Estimator<P::Float> for CubemapTexels<'_, P> {
    fn estimate(&self, l: u32, m: i32) -> P::Float {
        let size = self.cubemap.size();
        let half_texel = 1.0 / size as Real;

        let mut estimation = <P::Float as Pixel>::zero();
        for face in CubeFace::ALL {
            let bitmap = self.cubemap.face(face);
            for (row, texels) in bitmap.pixels().chunks_exact(size).enumerate() {
                let t = texel_center(row, size);
                for (col, &value) in texels.iter().enumerate() {
                    let s = texel_center(col, size);
                    let Spherical { phi, theta } = Spherical::from_cartesian(&face.direction(s, t));
                    let weight = sh_basis(l, m, phi, theta) * texel_solid_angle(s, t, half_texel);
                    estimation += value.convert::<P::Float>() * weight;
                }
            }
        }
        estimation
    }
}
