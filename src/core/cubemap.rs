//! Cube maps and the face geometry shared by sampling and rasterization.
//!
//! Face layout (OpenGL-style, image row 0 at the bottom):
//!
//! ```text
//! face   direction(s, t)    (u, v) - 0.5 from projection p
//! +X     ( 1,  t, -s)       (-p.z,  p.y)
//! -X     (-1,  t,  s)       ( p.z,  p.y)
//! +Y     ( s,  1, -t)       ( p.x, -p.z)
//! -Y     ( s, -1,  t)       ( p.x,  p.z)
//! +Z     ( s,  t,  1)       ( p.x,  p.y)
//! -Z     (-s,  t, -1)       (-p.x,  p.y)
//! ```
//!
//! `CubeFace::direction` and `CubeFace::project` are exact inverses of each
//! other; both the encoder and the decoder go through them.

use nalgebra::{Vector2, Vector3};
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::math::Real;
use super::pixel::Pixel;
use super::pixel_buffer::PixelBuffer;

/// One of the six cube faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    /// All faces in storage order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// File stem used when a face is written to disk.
    pub fn name(self) -> &'static str {
        match self {
            CubeFace::PositiveX => "posx",
            CubeFace::NegativeX => "negx",
            CubeFace::PositiveY => "posy",
            CubeFace::NegativeY => "negy",
            CubeFace::PositiveZ => "posz",
            CubeFace::NegativeZ => "negz",
        }
    }

    /// Direction (not normalized) through face coordinates `s, t` ∈ [-1, 1].
    pub fn direction(self, s: Real, t: Real) -> Vector3<Real> {
        match self {
            CubeFace::PositiveX => Vector3::new(1.0, t, -s),
            CubeFace::NegativeX => Vector3::new(-1.0, t, s),
            CubeFace::PositiveY => Vector3::new(s, 1.0, -t),
            CubeFace::NegativeY => Vector3::new(s, -1.0, t),
            CubeFace::PositiveZ => Vector3::new(s, t, 1.0),
            CubeFace::NegativeZ => Vector3::new(-s, t, -1.0),
        }
    }

    /// Face hit by `direction` and the normalized texture coordinate on it.
    ///
    /// Ties between axes resolve X before Y before Z. The zero vector maps to
    /// the centre of +X.
    pub fn project(direction: &Vector3<Real>) -> (CubeFace, Vector2<Real>) {
        let (ax, ay, az) = (direction.x.abs(), direction.y.abs(), direction.z.abs());
        let major = ax.max(ay).max(az);
        if major == 0.0 {
            return (CubeFace::PositiveX, Vector2::new(0.5, 0.5));
        }

        let face = if ax >= ay && ax >= az {
            if direction.x >= 0.0 {
                CubeFace::PositiveX
            } else {
                CubeFace::NegativeX
            }
        } else if ay >= az {
            if direction.y >= 0.0 {
                CubeFace::PositiveY
            } else {
                CubeFace::NegativeY
            }
        } else if direction.z >= 0.0 {
            CubeFace::PositiveZ
        } else {
            CubeFace::NegativeZ
        };

        // Perspective division onto the face plane at distance 0.5.
        let p = direction * (0.5 / major);
        let uv = match face {
            CubeFace::PositiveX => Vector2::new(-p.z, p.y),
            CubeFace::NegativeX => Vector2::new(p.z, p.y),
            CubeFace::PositiveY => Vector2::new(p.x, -p.z),
            CubeFace::NegativeY => Vector2::new(p.x, p.z),
            CubeFace::PositiveZ => Vector2::new(p.x, p.y),
            CubeFace::NegativeZ => Vector2::new(-p.x, p.y),
        };
        (face, uv.add_scalar(0.5))
    }
}

impl fmt::Display for CubeFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Face-plane coordinate of the centre of texel `index` on a face of `size` texels.
pub fn texel_center(index: usize, size: usize) -> Real {
    2.0 * (index as Real + 0.5) / size as Real - 1.0
}

/// Errors raised when assembling a cube map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CubeMapError {
    #[error("cube map face {face} is empty")]
    EmptyFace { face: CubeFace },

    #[error("cube map face {face} is {width}x{height}, faces must be square")]
    NotSquare {
        face: CubeFace,
        width: usize,
        height: usize,
    },

    #[error("cube map face {face} is {size}x{size}, expected {expected}x{expected}")]
    SizeMismatch {
        face: CubeFace,
        size: usize,
        expected: usize,
    },
}

/// Six square faces of identical size. Immutable once built.
///
/// Faces are reference counted so several cube maps (or a loader cache) can
/// share the same pixel data.
#[derive(Clone, Debug)]
pub struct CubeMap<P> {
    faces: [Arc<PixelBuffer<P>>; 6],
}

impl<P: Pixel> CubeMap<P> {
    /// Assemble a cube map from faces in +X, -X, +Y, -Y, +Z, -Z order.
    pub fn new(faces: [Arc<PixelBuffer<P>>; 6]) -> Result<Self, CubeMapError> {
        let expected = faces[0].width();
        for face in CubeFace::ALL {
            let buffer = &faces[face.index()];
            if buffer.width() == 0 || buffer.height() == 0 {
                return Err(CubeMapError::EmptyFace { face });
            }
            if buffer.width() != buffer.height() {
                return Err(CubeMapError::NotSquare {
                    face,
                    width: buffer.width(),
                    height: buffer.height(),
                });
            }
            if buffer.width() != expected {
                return Err(CubeMapError::SizeMismatch {
                    face,
                    size: buffer.width(),
                    expected,
                });
            }
        }
        Ok(Self { faces })
    }

    /// Same as [`CubeMap::new`] for owned buffers.
    pub fn from_buffers(faces: [PixelBuffer<P>; 6]) -> Result<Self, CubeMapError> {
        Self::new(faces.map(Arc::new))
    }

    /// Cube map with every texel set to `value`.
    pub fn uniform(size: usize, value: P) -> Self {
        let face = Arc::new(PixelBuffer::new(size.max(1), size.max(1), value));
        Self {
            faces: std::array::from_fn(|_| Arc::clone(&face)),
        }
    }

    /// Cube map whose texel value is `f(face, s, t)` at each texel centre.
    ///
    /// Texels are evaluated in parallel, one face row at a time.
    pub fn from_texel_fn(size: usize, f: impl Fn(CubeFace, Real, Real) -> P + Sync) -> Self {
        let size = size.max(1);
        let faces = CubeFace::ALL.map(|face| {
            let data: Vec<P> = (0..size)
                .into_par_iter()
                .flat_map_iter(|row| {
                    let t = texel_center(row, size);
                    let f = &f;
                    (0..size).map(move |col| f(face, texel_center(col, size), t))
                })
                .collect();
            Arc::new(PixelBuffer::from_parts(size, size, data))
        });
        Self { faces }
    }

    /// Cube map whose texel value is `f(direction)` at each texel centre.
    /// Directions are normalized.
    pub fn from_direction_fn(size: usize, f: impl Fn(&Vector3<Real>) -> P + Sync) -> Self {
        Self::from_texel_fn(size, |face, s, t| f(&face.direction(s, t).normalize()))
    }

    pub fn face(&self, face: CubeFace) -> &PixelBuffer<P> {
        &self.faces[face.index()]
    }

    /// Shared handle to a face.
    pub fn face_arc(&self, face: CubeFace) -> Arc<PixelBuffer<P>> {
        Arc::clone(&self.faces[face.index()])
    }

    /// Edge length of every face in texels.
    pub fn size(&self) -> usize {
        self.faces[0].width()
    }

    /// Convert every face to another pixel type.
    pub fn map<Q: Pixel>(&self, f: impl Fn(P) -> Q) -> CubeMap<Q> {
        CubeMap {
            faces: CubeFace::ALL.map(|face| Arc::new(self.face(face).map(&f))),
        }
    }
}
