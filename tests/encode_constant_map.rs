//! Encoding a constant cube map.
//!
//! A map of value `v` everywhere projects to `v·√(4π)` on y(0,0) and to zero
//! on every other basis function. Each integration method is held to its own
//! tolerance.

use approx::assert_relative_eq;
use sh_cubemap::coefficients::{encode, EncodeOptions};
use sh_cubemap::core::math::FOUR_PI;
use sh_cubemap::core::{CubeMap, Pixel, Rgb};
use sh_cubemap::sampling::{Filtering, SamplingMethod};

const VALUE: Rgb<f64> = Rgb::new(1.0, 0.5, 0.25);

fn constant_map() -> CubeMap<Rgb<f64>> {
    CubeMap::uniform(8, VALUE)
}

fn check(method: SamplingMethod, samples: u32, order: u32, dc_tolerance: f64, rest_tolerance: f64) {
    let options = EncodeOptions {
        order,
        method,
        samples,
        filtering: Filtering::Bilinear,
    };
    let coeffs = encode(&constant_map(), &options);
    assert_eq!(coeffs.order(), order);

    let dc = FOUR_PI.sqrt();
    assert_relative_eq!(coeffs[0].r, VALUE.r * dc, max_relative = dc_tolerance);
    assert_relative_eq!(coeffs[0].g, VALUE.g * dc, max_relative = dc_tolerance);
    assert_relative_eq!(coeffs[0].b, VALUE.b * dc, max_relative = dc_tolerance);

    for (l, m, c) in coeffs.iter_lm().skip(1) {
        for channel in 0..Rgb::<f64>::CHANNELS {
            let bound = rest_tolerance * VALUE.channel(channel) * dc;
            assert!(
                c.channel(channel).abs() < bound,
                "{method}: channel {channel} of ({l},{m}) = {} should vanish",
                c.channel(channel)
            );
        }
    }
}

#[test]
fn test_spherical_quadrature_constant_map() {
    check(SamplingMethod::Spherical, 5000, 2, 1e-3, 1e-3);
}

#[test]
fn test_monte_carlo_constant_map() {
    check(SamplingMethod::MonteCarlo, 512, 2, 5e-2, 5e-2);
}

#[test]
fn test_cubemap_weighted_constant_map() {
    check(SamplingMethod::Cubemap, 0, 3, 1e-3, 1e-9);
}

#[test]
fn test_order_is_preserved_for_every_method() {
    for method in [SamplingMethod::Spherical, SamplingMethod::MonteCarlo, SamplingMethod::Cubemap] {
        for order in [0, 1, 4] {
            let options = EncodeOptions {
                order,
                method,
                samples: 32,
                filtering: Filtering::Nearest,
            };
            let coeffs = encode(&CubeMap::uniform(2, VALUE), &options);
            assert_eq!(coeffs.order(), order, "{method}");
            assert_eq!(coeffs.len(), ((order + 1) * (order + 1)) as usize);
        }
    }
}
