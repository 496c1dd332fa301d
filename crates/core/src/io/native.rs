//! Native TIFF reading
//!
//! Uses the `tiff` crate. Samples are decoded in their on-disk type;
//! `read_raster` rejects any other element type and `read_raster_as`
//! only allows lossless widening, so values are never silently narrowed.

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement, SampleType};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

/// Which on-disk sample types a read accepts for element type `T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// On-disk type must be exactly `T`
    Exact,
    /// Any type that promotes to `T`
    Widen,
}

/// Read a TIFF file into a Raster
///
/// The file handle is closed before this returns, so only the decoded
/// samples outlive the call.
pub fn read_raster<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    decode_raster(open(path)?, Conversion::Exact).map_err(|e| with_path(e, path))
}

/// Read a TIFF file, widening its samples to `T`.
///
/// Fails with `SampleTypeMismatch` when `T` cannot hold every value of the
/// on-disk type (see [`SampleType::promote`]).
pub fn read_raster_as<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    decode_raster(open(path)?, Conversion::Widen).map_err(|e| with_path(e, path))
}

/// Read a TIFF from an in-memory buffer into a Raster
///
/// Same as `read_raster` but operates on a byte slice instead of a file path.
pub fn read_raster_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_raster(Cursor::new(data), Conversion::Exact)
}

/// Determine the sample type of a TIFF file from its header tags.
pub fn probe_sample_type<P: AsRef<Path>>(path: P) -> Result<SampleType> {
    let path = path.as_ref();
    let mut decoder = Decoder::new(open(path)?).map_err(|e| Error::decode(path.display(), e))?;
    header_sample_type(&mut decoder).map_err(|e| with_path(e, path))
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| Error::Open {
        path: path.display().to_string(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn header_sample_type<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<SampleType> {
    // BitsPerSample = 258, SampleFormat = 339 (defaults to unsigned)
    let bits = decoder
        .get_tag_u32_vec(Tag::BitsPerSample)
        .map_err(|e| Error::Other(format!("Cannot read bits per sample: {}", e)))?
        .first()
        .copied()
        .unwrap_or(1);
    let format = decoder
        .get_tag_u32_vec(Tag::SampleFormat)
        .ok()
        .and_then(|v| v.first().copied())
        .unwrap_or(1);

    SampleType::from_tiff(format, bits).ok_or_else(|| {
        Error::UnsupportedDataType(format!("sample format {} with {} bits", format, bits))
    })
}

/// Internal: decode a TIFF from any `Read + Seek` source
fn decode_raster<T, R>(reader: R, conversion: Conversion) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let found = match &result {
        DecodingResult::U8(_) => SampleType::U8,
        DecodingResult::U16(_) => SampleType::U16,
        DecodingResult::U32(_) => SampleType::U32,
        DecodingResult::U64(_) => SampleType::U64,
        DecodingResult::I8(_) => SampleType::I8,
        DecodingResult::I16(_) => SampleType::I16,
        DecodingResult::I32(_) => SampleType::I32,
        DecodingResult::I64(_) => SampleType::I64,
        DecodingResult::F32(_) => SampleType::F32,
        DecodingResult::F64(_) => SampleType::F64,
    };

    let accepted = match conversion {
        Conversion::Exact => found == T::SAMPLE_TYPE,
        Conversion::Widen => found.promote(T::SAMPLE_TYPE) == T::SAMPLE_TYPE,
    };
    if !accepted {
        return Err(Error::SampleTypeMismatch {
            expected: T::SAMPLE_TYPE,
            found,
        });
    }

    let data = match result {
        DecodingResult::U8(buf) => cast_samples(buf),
        DecodingResult::U16(buf) => cast_samples(buf),
        DecodingResult::U32(buf) => cast_samples(buf),
        DecodingResult::U64(buf) => cast_samples(buf),
        DecodingResult::I8(buf) => cast_samples(buf),
        DecodingResult::I16(buf) => cast_samples(buf),
        DecodingResult::I32(buf) => cast_samples(buf),
        DecodingResult::I64(buf) => cast_samples(buf),
        DecodingResult::F32(buf) => cast_samples(buf),
        DecodingResult::F64(buf) => cast_samples(buf),
    };
    // Target type holds every source value, so every cast succeeds
    let data = data.ok_or_else(|| Error::Other("Sample conversion failed".into()))?;

    let pixels = rows * cols;
    if pixels == 0 || data.len() % pixels != 0 {
        return Err(Error::InvalidDimensions {
            shape: vec![rows, cols],
            len: data.len(),
        });
    }

    let bands = data.len() / pixels;
    if bands == 1 {
        Raster::from_vec(data, &[rows, cols])
    } else {
        Raster::from_vec(data, &[rows, cols, bands])
    }
}

fn cast_samples<S, T>(buf: Vec<S>) -> Option<Vec<T>>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter().map(num_traits::cast).collect()
}

fn with_path(err: Error, path: &Path) -> Error {
    match err {
        Error::Other(reason) => Error::decode(path.display(), reason),
        Error::SampleTypeMismatch { .. }
        | Error::UnsupportedDataType(_)
        | Error::InvalidDimensions { .. } => Error::decode(path.display(), err),
        other => other,
    }
}
