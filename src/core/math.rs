//! Scalar type, spherical coordinates and low-discrepancy sequences.
//!
//! Coordinate convention (used by the sampler, the integrators and the
//! rasterizer alike):
//!
//! ```text
//! x = sin(θ)·sin(φ)
//! y = cos(θ)
//! z = sin(θ)·cos(φ)
//! ```
//!
//! so θ is measured from +Y and φ turns from +Z towards +X.

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Floating point type used for all geometry and SH math.
pub type Real = f64;

pub const TWO_PI: Real = 2.0 * PI;
pub const FOUR_PI: Real = 4.0 * PI;

/// A direction expressed as azimuth `phi` ∈ [0, 2π) and polar angle `theta` ∈ [0, π].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub phi: Real,
    pub theta: Real,
}

impl Spherical {
    pub fn new(phi: Real, theta: Real) -> Self {
        Self { phi, theta }
    }

    /// Unit vector for these angles.
    pub fn to_cartesian(&self) -> Vector3<Real> {
        let sin_theta = self.theta.sin();
        Vector3::new(
            sin_theta * self.phi.sin(),
            self.theta.cos(),
            sin_theta * self.phi.cos(),
        )
    }

    /// Angles of a direction. The input does not need to be normalized.
    pub fn from_cartesian(direction: &Vector3<Real>) -> Self {
        let n = direction.norm();
        let y = if n > 0.0 { direction.y / n } else { 1.0 };
        Self {
            phi: direction.x.atan2(direction.z).rem_euclid(TWO_PI),
            theta: y.clamp(-1.0, 1.0).acos(),
        }
    }
}

/// Van der Corput radical inverse in base 2.
pub fn radical_inverse(index: u32) -> Real {
    index.reverse_bits() as Real * (1.0 / 4_294_967_296.0)
}

/// Point `i` of an `n`-point 2D Hammersley set: (radical inverse, i/n).
pub fn hammersley(i: u32, n: u32) -> (Real, Real) {
    (radical_inverse(i), i as Real / n as Real)
}

/// Map a point of the unit square to uniformly distributed sphere angles.
///
/// `θ = 2·acos(√(1−ex))` gives `cos θ = 1 − 2·ex`, uniform in [−1, 1].
pub fn sample_sphere(ex: Real, ey: Real) -> Spherical {
    Spherical {
        phi: TWO_PI * ey,
        theta: 2.0 * (1.0 - ex).max(0.0).sqrt().acos(),
    }
}

/// Signed area of the projection of the rectangle [0,x]×[0,y] of the cube face
/// plane (at distance 1) onto the unit sphere.
pub fn area_element(x: Real, y: Real) -> Real {
    (x * y).atan2((x * x + y * y + 1.0).sqrt())
}

/// Solid angle subtended by the face texel centred at `(s, t)` with half
/// extent `half_size`, all in face coordinates [−1, 1].
pub fn texel_solid_angle(s: Real, t: Real, half_size: Real) -> Real {
    let x0 = s - half_size;
    let x1 = s + half_size;
    let y0 = t - half_size;
    let y1 = t + half_size;
    area_element(x0, y0) - area_element(x0, y1) - area_element(x1, y0) + area_element(x1, y1)
}
