//! I/O operations for reading raster images and walking dataset folders

mod listing;
mod native;

pub use listing::{has_tif_extension, list_subdirectories, list_tif_files};
pub use native::{probe_sample_type, read_raster, read_raster_as, read_raster_from_buffer};
