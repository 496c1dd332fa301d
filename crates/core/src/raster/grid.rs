//! Main Raster type

use crate::error::{Error, Result};
use crate::raster::RasterElement;
use ndarray::{ArrayD, IxDyn};

/// A decoded raster image.
///
/// `Raster<T>` stores samples of type `T` in an N-dimensional array.
/// Single-band images have shape `(rows, cols)`; multi-band images keep
/// their interleaved layout as `(rows, cols, bands)`.
///
/// # Example
///
/// ```ignore
/// use rastats_core::Raster;
///
/// let mask: Raster<u8> = Raster::from_vec(vec![0, 0, 0, 1], &[2, 2])?;
/// assert_eq!(mask.shape(), &[2, 2]);
/// assert_eq!(mask.get(&[1, 1])?, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    data: ArrayD<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new single-band raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: ArrayD::zeros(IxDyn(&[rows, cols])),
        }
    }

    /// Create a new single-band raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(&[rows, cols]), value),
        }
    }

    /// Create a raster from row-major samples and a shape
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let len = data.len();
        if shape.is_empty() || shape.iter().product::<usize>() != len {
            return Err(Error::InvalidDimensions {
                shape: shape.to_vec(),
                len,
            });
        }

        let array = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.shape()[0]
    }

    /// Number of columns (1 for a rank-1 raster)
    pub fn cols(&self) -> usize {
        self.data.shape().get(1).copied().unwrap_or(1)
    }

    /// Samples per pixel (product of every axis past the second)
    pub fn bands(&self) -> usize {
        self.data.shape().iter().skip(2).product()
    }

    /// Full shape, e.g. `[rows, cols]` or `[rows, cols, bands]`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Total number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the raster holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get the sample at a full index
    pub fn get(&self, index: &[usize]) -> Result<T> {
        if index.len() != self.data.ndim() {
            return Err(self.out_of_bounds(index));
        }
        self.data
            .get(IxDyn(index))
            .copied()
            .ok_or_else(|| self.out_of_bounds(index))
    }

    /// Iterate over every sample in logical (row-major) order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    fn out_of_bounds(&self, index: &[usize]) -> Error {
        Error::IndexOutOfBounds {
            index: index.to_vec(),
            shape: self.shape().to_vec(),
        }
    }
}
