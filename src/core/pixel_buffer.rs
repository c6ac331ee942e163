//! Row-major 2D pixel storage with bounds-checked access.

use thiserror::Error;

use super::pixel::Pixel;

/// Errors raised by pixel buffer access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("{axis} index {index} out of range (len {len})")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    #[error("pixel data has {actual} values, expected {expected} ({width}x{height})")]
    DataLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },
}

/// A `width × height` image stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer<P> {
    width: usize,
    height: usize,
    data: Vec<P>,
}

impl<P: Pixel> PixelBuffer<P> {
    /// Buffer filled with `value`.
    pub fn new(width: usize, height: usize, value: P) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap existing row-major data.
    pub fn from_vec(width: usize, height: usize, data: Vec<P>) -> Result<Self, PixelError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(PixelError::DataLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer by evaluating `f(row, col)` for every pixel.
    /// Wrap data whose length the caller already guarantees.
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<P>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> P) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[P] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<P> {
        self.data
    }

    /// One row of pixels.
    pub fn row(&self, row: usize) -> Result<&[P], PixelError> {
        if row >= self.height {
            return Err(PixelError::IndexOutOfRange {
                axis: "row",
                index: row,
                len: self.height,
            });
        }
        let start = row * self.width;
        Ok(&self.data[start..start + self.width])
    }

    pub fn get(&self, row: usize, col: usize) -> Result<P, PixelError> {
        let index = self.index(row, col)?;
        Ok(self.data[index])
    }

    pub fn set(&mut self, row: usize, col: usize, value: P) -> Result<(), PixelError> {
        let index = self.index(row, col)?;
        self.data[index] = value;
        Ok(())
    }

    /// Apply `f` to every pixel, producing a buffer of another pixel type.
    pub fn map<Q: Pixel>(&self, f: impl Fn(P) -> Q) -> PixelBuffer<Q> {
        PixelBuffer {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&p| f(p)).collect(),
        }
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, PixelError> {
        if row >= self.height {
            return Err(PixelError::IndexOutOfRange {
                axis: "row",
                index: row,
                len: self.height,
            });
        }
        if col >= self.width {
            return Err(PixelError::IndexOutOfRange {
                axis: "column",
                index: col,
                len: self.width,
            });
        }
        Ok(row * self.width + col)
    }
}
