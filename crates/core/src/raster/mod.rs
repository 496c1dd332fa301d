//! Raster data structures

mod element;
mod grid;

pub use element::{RasterElement, SampleType};
pub use grid::Raster;
