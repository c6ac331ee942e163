//! SH coefficients → point values and cube maps.

use log::debug;
use nalgebra::Vector3;

use super::ShCoefficients;
use crate::core::{sh_basis, CubeMap, Pixel, Real, Spherical};

/// Reconstruct the signal at (phi, theta): Σ c(l,m)·y(l,m,phi,theta).
pub fn decode<P: Pixel>(coefficients: &ShCoefficients<P>, phi: Real, theta: Real) -> P {
    reconstruct(coefficients, phi, theta).convert()
}

fn reconstruct<P: Pixel>(coefficients: &ShCoefficients<P>, phi: Real, theta: Real) -> P::Float {
    coefficients
        .iter_lm()
        .fold(<P::Float as Pixel>::zero(), |acc, (l, m, c)| {
            acc + c.convert::<P::Float>() * sh_basis(l, m, phi, theta)
        })
}

/// Reconstruct the signal along a direction.
pub fn decode_direction<P: Pixel>(coefficients: &ShCoefficients<P>, direction: &Vector3<Real>) -> P {
    let Spherical { phi, theta } = Spherical::from_cartesian(direction);
    decode(coefficients, phi, theta)
}

/// Rasterize the expansion into a cube map with `size × size` faces.
///
/// Each texel is evaluated at the centre direction given by
/// [`crate::core::CubeFace::direction`], the inverse of the sampler's projection. The
/// output pixel type may differ from the coefficient type.
pub fn decode_to_cubemap<P: Pixel, Q: Pixel>(coefficients: &ShCoefficients<P>, size: usize) -> CubeMap<Q> {
    let size = size.max(1);
    debug!(
        "decoding order-{} coefficients into {size}x{size} faces",
        coefficients.order()
    );

    CubeMap::from_texel_fn(size, |face, s, t| {
        let Spherical { phi, theta } = Spherical::from_cartesian(&face.direction(s, t));
        reconstruct(coefficients, phi, theta).convert()
    })
}
