//! Directional sampling of cube maps.
//!
//! A direction is projected onto its cube face (see [`CubeFace::project`]),
//! turned into texel space with texel centres at `i + 0.5`, and filtered.
//! Texel lookups clamp to the face edge; nothing wraps across faces.

pub mod integrate;

use nalgebra::{Vector2, Vector3};
use std::fmt;
use std::str::FromStr;

use crate::core::{CubeFace, CubeMap, ParseEnumError, Pixel, PixelBuffer, Real, Spherical};

pub use integrate::{
    quadrature_divisions, CubemapTexels, Estimator, MonteCarlo, SamplingMethod, SphericalQuadrature,
};

/// Smallest span used between two texel corners. Faces of size 1 collapse
/// both corners onto the same texel.
const MIN_SPAN: Real = 1e-6;

/// Texture filtering used when sampling a face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Filtering {
    Nearest,
    #[default]
    Bilinear,
}

impl FromStr for Filtering {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Filtering::Nearest),
            "linear" | "bilinear" => Ok(Filtering::Bilinear),
            other => Err(ParseEnumError::new("filtering", other, "linear, nearest")),
        }
    }
}

impl fmt::Display for Filtering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filtering::Nearest => f.write_str("nearest"),
            Filtering::Bilinear => f.write_str("linear"),
        }
    }
}

/// Two neighbouring texel indices along one axis and the blend weight of
/// the second one.
#[derive(Clone, Copy, Debug)]
struct AxisSpan {
    lo: usize,
    hi: usize,
    weight: Real,
}

fn axis_span(coord: Real, len: usize) -> AxisSpan {
    let max = len.saturating_sub(1) as Real;
    let c = coord.clamp(0.0, max);
    let lo = c.floor();
    let hi = (lo + 1.0).min(max);
    let span = (hi - lo).max(MIN_SPAN);
    AxisSpan {
        lo: lo as usize,
        hi: hi as usize,
        weight: ((c - lo) / span).clamp(0.0, 1.0),
    }
}

/// Sample a single face at normalized texture coordinates `uv` ∈ [0, 1]².
///
/// `uv.x` runs along columns, `uv.y` along rows. The blend is computed in
/// `P::Float` and converted back once.
pub fn sample_bitmap<P: Pixel>(bitmap: &PixelBuffer<P>, uv: &Vector2<Real>, filtering: Filtering) -> P {
    filter_bitmap(bitmap, uv, filtering).convert()
}

fn filter_bitmap<P: Pixel>(bitmap: &PixelBuffer<P>, uv: &Vector2<Real>, filtering: Filtering) -> P::Float {
    let width = bitmap.width();
    let x = axis_span(uv.x * width as Real - 0.5, width);
    let y = axis_span(uv.y * bitmap.height() as Real - 0.5, bitmap.height());

    let pixels = bitmap.pixels();
    let at = |row: usize, col: usize| pixels[row * width + col].convert::<P::Float>();
    let q11 = at(y.lo, x.lo);
    let q12 = at(y.hi, x.lo);
    let q21 = at(y.lo, x.hi);
    let q22 = at(y.hi, x.hi);

    // Each corner weighs with the area of the opposite sub-rectangle.
    let w11 = (1.0 - x.weight) * (1.0 - y.weight);
    let w12 = (1.0 - x.weight) * y.weight;
    let w21 = x.weight * (1.0 - y.weight);
    let w22 = x.weight * y.weight;

    match filtering {
        Filtering::Bilinear => q11 * w11 + q12 * w12 + q21 * w21 + q22 * w22,
        Filtering::Nearest => {
            let mut best = (w11, q11);
            for (w, q) in [(w12, q12), (w21, q21), (w22, q22)] {
                if w > best.0 {
                    best = (w, q);
                }
            }
            best.1
        }
    }
}

/// Value of the cube map seen along `direction`.
pub fn sample_cubemap<P: Pixel>(cubemap: &CubeMap<P>, direction: &Vector3<Real>, filtering: Filtering) -> P {
    let (face, uv) = CubeFace::project(direction);
    sample_bitmap(cubemap.face(face), &uv, filtering)
}

/// A function over the sphere, parameterized by (phi, theta).
pub trait PolarFunction: Sync {
    type Output: Pixel;

    fn eval(&self, phi: Real, theta: Real) -> Self::Output;
}

impl<P, F> PolarFunction for F
where
    P: Pixel,
    F: Fn(Real, Real) -> P + Sync,
{
    type Output = P;

    fn eval(&self, phi: Real, theta: Real) -> P {
        self(phi, theta)
    }
}

/// A cube map viewed as a continuous function of direction.
///
/// Samples are returned unrounded, in `P::Float`.
#[derive(Clone, Copy, Debug)]
pub struct CubeMapFunction<'a, P> {
    cubemap: &'a CubeMap<P>,
    filtering: Filtering,
}

impl<'a, P: Pixel> CubeMapFunction<'a, P> {
    pub fn new(cubemap: &'a CubeMap<P>, filtering: Filtering) -> Self {
        Self { cubemap, filtering }
    }
}

impl<P: Pixel> PolarFunction for CubeMapFunction<'_, P> {
    type Output = P::Float;

    fn eval(&self, phi: Real, theta: Real) -> P::Float {
        let direction = Spherical::new(phi, theta).to_cartesian();
        let (face, uv) = CubeFace::project(&direction);
        filter_bitmap(self.cubemap.face(face), &uv, self.filtering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rgb;
    use approx::assert_relative_eq;

    fn ramp(width: usize, height: usize) -> PixelBuffer<Rgb<f32>> {
        PixelBuffer::from_fn(width, height, |row, col| Rgb::new(col as f32, row as f32, 0.0))
    }

    #[test]
    fn test_bilinear_hits_texel_centers() {
        let bitmap = ramp(4, 4);
        // Centre of texel (row 2, col 1) is at uv = ((1 + 0.5)/4, (2 + 0.5)/4).
        let p = sample_bitmap(&bitmap, &Vector2::new(1.5 / 4.0, 2.5 / 4.0), Filtering::Bilinear);
        assert_relative_eq!(p.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(p.g, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_bilinear_interpolates_between_texels() {
        let bitmap = ramp(4, 4);
        let p = sample_bitmap(&bitmap, &Vector2::new(0.5, 0.5), Filtering::Bilinear);
        assert_relative_eq!(p.r, 1.5, epsilon = 1e-6);
        assert_relative_eq!(p.g, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_coordinates_clamp_to_edge() {
        let bitmap = ramp(4, 4);
        let low = sample_bitmap(&bitmap, &Vector2::new(0.0, 0.0), Filtering::Bilinear);
        let high = sample_bitmap(&bitmap, &Vector2::new(1.0, 1.0), Filtering::Bilinear);
        assert_eq!(low, Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(high, Rgb::new(3.0, 3.0, 0.0));
    }

    #[test]
    fn test_nearest_picks_closest_corner() {
        let bitmap = ramp(4, 4);
        // x = 0.9·4 - 0.5 = 3.1 → col 3; y = 0.3·4 - 0.5 = 0.7 → row 1
        let p = sample_bitmap(&bitmap, &Vector2::new(0.9, 0.3), Filtering::Nearest);
        assert_eq!(p, Rgb::new(3.0, 1.0, 0.0));

        // x = 1.2 → col 1, y = 2.8 → row 3
        let p = sample_bitmap(&bitmap, &Vector2::new(1.7 / 4.0, 3.3 / 4.0), Filtering::Nearest);
        assert_eq!(p, Rgb::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_byte_faces_blend_before_rounding() {
        let bitmap = PixelBuffer::new(2, 2, Rgb::new(1u8, 3, 200));
        let p = sample_bitmap(&bitmap, &Vector2::new(0.5, 0.5), Filtering::Bilinear);
        assert_eq!(p, Rgb::new(1, 3, 200));
    }

    #[test]
    fn test_cubemap_function_keeps_fractional_samples() {
        let cubemap = CubeMap::from_texel_fn(2, |_, s, _| {
            if s < 0.0 {
                Rgb::new(0u8, 0, 0)
            } else {
                Rgb::new(1, 1, 1)
            }
        });
        let function = CubeMapFunction::new(&cubemap, Filtering::Bilinear);
        // Straight at the centre of +Z, halfway between the two columns.
        let value = function.eval(0.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(value.r, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_single_texel_face_is_constant() {
        let bitmap = PixelBuffer::new(1, 1, Rgb::new(0.25f32, 0.5, 0.75));
        for &(u, v) in &[(0.0, 0.0), (0.5, 0.5), (1.0, 0.3)] {
            for filtering in [Filtering::Nearest, Filtering::Bilinear] {
                let p = sample_bitmap(&bitmap, &Vector2::new(u, v), filtering);
                assert_eq!(p, Rgb::new(0.25, 0.5, 0.75));
            }
        }
    }

    #[test]
    fn test_filtering_names() {
        assert_eq!("linear".parse::<Filtering>().unwrap(), Filtering::Bilinear);
        assert_eq!("nearest".parse::<Filtering>().unwrap(), Filtering::Nearest);
        assert!("cubic".parse::<Filtering>().is_err());
        assert_eq!(Filtering::Bilinear.to_string(), "linear");
    }
}
