//! Pixel values: fixed-arity RGB/RGBA tuples over a small set of channel types.
//!
//! Only two layouts exist (3 and 4 channels) and only three channel
//! representations (`u8`, `f32`, `f64`). The `Channel` trait is sealed so the
//! set stays closed; everything else in the crate is written against `Pixel`.
//!
//! Arithmetic is componentwise. Byte channels are promoted to `Real` for the
//! operation and rounded/saturated back, so `Rgb<u8>` arithmetic never wraps.
//! Sampling and integration widen texels to [`Pixel::Float`] first, so a byte
//! pixel is rounded at most once per result.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

use super::math::Real;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// Storage type of a single channel.
pub trait Channel: Copy + Default + Debug + PartialEq + Send + Sync + 'static + sealed::Sealed {
    fn to_real(self) -> Real;
    fn from_real(value: Real) -> Self;
}

impl Channel for u8 {
    fn to_real(self) -> Real {
        self as Real
    }

    fn from_real(value: Real) -> Self {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, 255.0) as u8
    }
}

impl Channel for f32 {
    fn to_real(self) -> Real {
        self as Real
    }

    fn from_real(value: Real) -> Self {
        value as f32
    }
}

impl Channel for f64 {
    fn to_real(self) -> Real {
        self
    }

    fn from_real(value: Real) -> Self {
        value
    }
}

/// A pixel value the sampling and SH code can do arithmetic on.
pub trait Pixel:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Mul<Real, Output = Self>
    + Div<Real, Output = Self>
{
    /// Number of channels (3 or 4).
    const CHANNELS: usize;

    /// Same layout with `Real` channels. Weighted sums are accumulated here.
    type Float: Pixel<Float = Self::Float>;

    /// All channels set to `value`.
    fn splat(value: Real) -> Self;

    fn zero() -> Self {
        Self::splat(0.0)
    }

    /// Channel `index` as a real number. Indices past `CHANNELS` read as 0.
    fn channel(&self, index: usize) -> Real;

    /// Build from channel values in r, g, b, a order; missing values are 0.
    fn from_channels(values: &[Real]) -> Self;

    /// Channel-wise conversion into another pixel layout.
    fn convert<Q: Pixel>(&self) -> Q {
        let mut values = [0.0; 4];
        for (i, value) in values.iter_mut().enumerate().take(Self::CHANNELS) {
            *value = self.channel(i);
        }
        Q::from_channels(&values[..Self::CHANNELS])
    }
}

/// Three-channel color.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

/// Color with alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba<T> {
    pub r: T,
    pub g: T,
    pub b: T,
    pub a: T,
}

impl<T> Rgb<T> {
    pub const fn new(r: T, g: T, b: T) -> Self {
        Self { r, g, b }
    }
}

impl<T> Rgba<T> {
    pub const fn new(r: T, g: T, b: T, a: T) -> Self {
        Self { r, g, b, a }
    }
}

impl<T: Channel> Rgb<T> {
    /// Convert the channel representation, keeping the layout.
    pub fn cast<U: Channel>(self) -> Rgb<U> {
        Rgb {
            r: U::from_real(self.r.to_real()),
            g: U::from_real(self.g.to_real()),
            b: U::from_real(self.b.to_real()),
        }
    }
}

impl<T: Channel> Rgba<T> {
    pub fn cast<U: Channel>(self) -> Rgba<U> {
        Rgba {
            r: U::from_real(self.r.to_real()),
            g: U::from_real(self.g.to_real()),
            b: U::from_real(self.b.to_real()),
            a: U::from_real(self.a.to_real()),
        }
    }
}

// Componentwise operators for both layouts. Every operation goes through
// `Real` so byte channels saturate instead of overflowing.
macro_rules! impl_pixel_ops {
    ($ty:ident, $count:expr, $($field:ident),+) => {
        impl<T: Channel> Add for $ty<T> {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() + rhs.$field.to_real())),+ }
            }
        }

        impl<T: Channel> AddAssign for $ty<T> {
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl<T: Channel> Sub for $ty<T> {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() - rhs.$field.to_real())),+ }
            }
        }

        impl<T: Channel> Mul for $ty<T> {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() * rhs.$field.to_real())),+ }
            }
        }

        impl<T: Channel> Div for $ty<T> {
            type Output = Self;
            fn div(self, rhs: Self) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() / rhs.$field.to_real())),+ }
            }
        }

        impl<T: Channel> Mul<Real> for $ty<T> {
            type Output = Self;
            fn mul(self, rhs: Real) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() * rhs)),+ }
            }
        }

        impl<T: Channel> Div<Real> for $ty<T> {
            type Output = Self;
            fn div(self, rhs: Real) -> Self {
                $ty { $($field: T::from_real(self.$field.to_real() / rhs)),+ }
            }
        }

        impl<T: Channel> Pixel for $ty<T> {
            const CHANNELS: usize = $count;
            type Float = $ty<Real>;

            fn splat(value: Real) -> Self {
                $ty { $($field: T::from_real(value)),+ }
            }

            fn channel(&self, index: usize) -> Real {
                let values = [$(self.$field.to_real()),+];
                values.get(index).copied().unwrap_or(0.0)
            }

            fn from_channels(values: &[Real]) -> Self {
                let mut iter = values.iter().copied();
                $ty { $($field: T::from_real(iter.next().unwrap_or(0.0))),+ }
            }
        }
    };
}

impl_pixel_ops!(Rgb, 3, r, g, b);
impl_pixel_ops!(Rgba, 4, r, g, b, a);

/// Byte RGB, as decoded from 8-bit images.
pub type Rgb8 = Rgb<u8>;
/// Float RGB, the face format used for sampling.
pub type Rgb32F = Rgb<f32>;
/// Float RGBA.
pub type Rgba32F = Rgba<f32>;
/// Double-precision RGB, the coefficient format.
pub type RgbReal = Rgb<Real>;
/// Double-precision RGBA coefficients.
pub type RgbaReal = Rgba<Real>;
