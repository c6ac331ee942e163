//! SH coefficient vectors and the encode/decode engine.
//!
//! - `ShCoefficients`: (N+1)² pixel-valued coefficients, indexed by (l, m)
//! - `encode`: project a cube map (or any polar function) onto the basis
//! - `decode`: reconstruct point values or a whole cube map

mod decode;
mod encode;

use std::ops::Index;
use thiserror::Error;

use crate::core::sh::sh_lm;
use crate::core::{coefficient_count, sh_index, Pixel};

pub use decode::{decode, decode_direction, decode_to_cubemap};
pub use encode::{encode, project, EncodeOptions};

/// Errors raised when building a coefficient vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoefficientError {
    #[error("{len} coefficients is not (order + 1)² for any order")]
    InvalidLength { len: usize },

    #[error("coefficient (l={l}, m={m}) is not stored in an order-{order} expansion")]
    OutOfRange { l: u32, m: i32, order: u32 },
}

/// Coefficients of an order-N SH expansion, stored at `l·(l+1) + m`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShCoefficients<P> {
    values: Vec<P>,
}

impl<P: Pixel> ShCoefficients<P> {
    /// All-zero expansion of the given order.
    pub fn zeros(order: u32) -> Self {
        Self {
            values: vec![P::zero(); coefficient_count(order)],
        }
    }

    /// Wrap a vector whose length is a non-zero perfect square.
    pub fn from_vec(values: Vec<P>) -> Result<Self, CoefficientError> {
        let len = values.len();
        let root = integer_sqrt(len);
        if len == 0 || root * root != len {
            return Err(CoefficientError::InvalidLength { len });
        }
        Ok(Self { values })
    }

    /// Highest band stored: `floor(sqrt(len)) - 1`.
    pub fn order(&self) -> u32 {
        order_of_len(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Coefficient for band `l`, index `m`, if stored.
    pub fn get(&self, l: u32, m: i32) -> Option<P> {
        if m.unsigned_abs() > l {
            return None;
        }
        self.values.get(sh_index(l, m)).copied()
    }

    pub fn set(&mut self, l: u32, m: i32, value: P) -> Result<(), CoefficientError> {
        let index = sh_index(l, m);
        match self.values.get_mut(index) {
            Some(slot) if m.unsigned_abs() <= l => {
                *slot = value;
                Ok(())
            }
            _ => Err(CoefficientError::OutOfRange {
                l,
                m,
                order: self.order(),
            }),
        }
    }

    pub fn as_slice(&self) -> &[P] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<P> {
        self.values
    }

    /// Iterate `(l, m, coefficient)` in storage order.
    pub fn iter_lm(&self) -> impl Iterator<Item = (u32, i32, P)> + '_ {
        self.values.iter().enumerate().map(|(index, &value)| {
            let (l, m) = sh_lm(index);
            (l, m, value)
        })
    }

    /// Convert every coefficient to another pixel layout.
    pub fn convert<Q: Pixel>(&self) -> ShCoefficients<Q> {
        ShCoefficients {
            values: self.values.iter().map(|c| c.convert()).collect(),
        }
    }

    /// Copy truncated (or zero-padded) to `order`.
    pub fn with_order(&self, order: u32) -> Self {
        let mut values = self.values.clone();
        values.resize(coefficient_count(order), P::zero());
        Self { values }
    }
}

impl<P> Index<usize> for ShCoefficients<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.values[index]
    }
}

/// Order recovered from a coefficient count.
pub fn order_of_len(len: usize) -> u32 {
    integer_sqrt(len).saturating_sub(1) as u32
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Inner product Σ a[i]·b[i], per channel.
///
/// Both vectors are expected to have the same order; extra coefficients of
/// the longer one are ignored.
pub fn product<P: Pixel>(a: &ShCoefficients<P>, b: &ShCoefficients<P>) -> P {
    debug_assert_eq!(a.len(), b.len(), "coefficient vectors differ in order");
    a.values
        .iter()
        .zip(&b.values)
        .fold(<P::Float as Pixel>::zero(), |acc, (x, y)| {
            acc + x.convert::<P::Float>() * y.convert::<P::Float>()
        })
        .convert()
}
