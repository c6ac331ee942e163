//! Cube map → SH coefficients.

use log::debug;
use rayon::prelude::*;

use super::ShCoefficients;
use crate::core::sh::sh_lm;
use crate::core::{coefficient_count, CubeMap, Pixel};
use crate::sampling::{
    CubeMapFunction, CubemapTexels, Estimator, Filtering, MonteCarlo, SamplingMethod,
    SphericalQuadrature,
};

/// Engine-level encode parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Highest SH band to compute.
    pub order: u32,
    /// Integration strategy.
    pub method: SamplingMethod,
    /// Sample budget for the quadrature and Monte-Carlo estimators. Ignored by
    /// the cubemap estimator, which visits every texel.
    pub samples: u32,
    /// Filtering used when the source is sampled by direction.
    pub filtering: Filtering,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            order: 2,
            method: SamplingMethod::MonteCarlo,
            samples: 64,
            filtering: Filtering::Bilinear,
        }
    }
}

/// Estimate every coefficient up to `order` with `estimator`.
///
/// Coefficients are independent, so they are computed in parallel.
pub fn project<P: Pixel, E: Estimator<P>>(estimator: &E, order: u32) -> ShCoefficients<P> {
    let values: Vec<P> = (0..coefficient_count(order))
        .into_par_iter()
        .map(|index| {
            let (l, m) = sh_lm(index);
            estimator.estimate(l, m)
        })
        .collect();
    ShCoefficients { values }
}

/// Project a cube map onto the SH basis.
///
/// Coefficients come back in `P::Float`: they can be negative or exceed the
/// range of byte channels.
pub fn encode<P: Pixel>(cubemap: &CubeMap<P>, options: &EncodeOptions) -> ShCoefficients<P::Float> {
    debug!(
        "encoding {}x{} cube map: order={} method={} samples={} filtering={}",
        cubemap.size(),
        cubemap.size(),
        options.order,
        options.method,
        options.samples,
        options.filtering
    );

    match options.method {
        SamplingMethod::Spherical => {
            let source = CubeMapFunction::new(cubemap, options.filtering);
            let estimator = SphericalQuadrature::with_samples(&source, options.samples);
            debug!("quadrature grid: {} divisions", estimator.divisions());
            project(&estimator, options.order)
        }
        SamplingMethod::MonteCarlo => {
            let source = CubeMapFunction::new(cubemap, options.filtering);
            project(&MonteCarlo::new(&source, options.samples), options.order)
        }
        SamplingMethod::Cubemap => project(&CubemapTexels::new(cubemap), options.order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::FOUR_PI;
    use crate::core::Rgb;
    use approx::assert_relative_eq;

    #[test]
    fn test_encode_length_matches_order() {
        let cubemap = CubeMap::uniform(4, Rgb::<f64>::splat(1.0));
        for order in [0, 1, 3] {
            let options = EncodeOptions {
                order,
                ..EncodeOptions::default()
            };
            let coeffs = encode(&cubemap, &options);
            assert_eq!(coeffs.len(), ((order + 1) * (order + 1)) as usize);
            assert_eq!(coeffs.order(), order);
        }
    }

    #[test]
    fn test_project_visits_every_band() {
        struct IndexEstimator;
        impl Estimator<Rgb<f64>> for IndexEstimator {
            fn estimate(&self, l: u32, m: i32) -> Rgb<f64> {
                Rgb::new(l as f64, m as f64, 0.0)
            }
        }

        let coeffs = project(&IndexEstimator, 2);
        assert_eq!(coeffs[0], Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(coeffs[3], Rgb::new(1.0, 1.0, 0.0));
        assert_eq!(coeffs[4], Rgb::new(2.0, -2.0, 0.0));
    }

    #[test]
    fn test_byte_constant_map_encodes_unclamped() {
        let cubemap = CubeMap::uniform(8, Rgb::<u8>::new(100, 100, 100));
        for method in [SamplingMethod::Spherical, SamplingMethod::MonteCarlo, SamplingMethod::Cubemap] {
            let options = EncodeOptions {
                order: 1,
                method,
                samples: 5000,
                ..EncodeOptions::default()
            };
            let coeffs: ShCoefficients<Rgb<f64>> = encode(&cubemap, &options);
            assert_relative_eq!(coeffs[0].r, 354.49, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_byte_gradient_keeps_negative_terms() {
        let gradient = |face: crate::core::CubeFace, s: f64, t: f64| {
            let x = face.direction(s, t).normalize().x;
            100.0 + 50.0 * x
        };
        let bytes = CubeMap::from_texel_fn(16, |face, s, t| Rgb::<u8>::splat(gradient(face, s, t)));
        let reals = CubeMap::from_texel_fn(16, |face, s, t| Rgb::<f64>::splat(gradient(face, s, t)));
        let options = EncodeOptions {
            order: 1,
            method: SamplingMethod::Cubemap,
            ..EncodeOptions::default()
        };

        let from_bytes = encode(&bytes, &options);
        let from_reals = encode(&reals, &options);
        assert!(from_reals[1].r < -100.0);
        for (a, b) in from_bytes.as_slice().iter().zip(from_reals.as_slice()) {
            assert!((a.r - b.r).abs() < 2.0, "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_cubemap_method_dc_is_exact_for_constant_map() {
        let cubemap = CubeMap::uniform(6, Rgb::<f64>::new(0.5, 1.0, 2.0));
        let options = EncodeOptions {
            order: 1,
            method: SamplingMethod::Cubemap,
            ..EncodeOptions::default()
        };
        let coeffs = encode(&cubemap, &options);
        assert_relative_eq!(coeffs[0].b, 2.0 * FOUR_PI.sqrt(), max_relative = 1e-12);
        for index in 1..4 {
            assert!(coeffs[index].b.abs() < 1e-12);
        }
    }
}
