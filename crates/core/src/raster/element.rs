//! Raster element trait for generic sample values

use num_traits::{NumCast, Zero};
use std::fmt::{self, Debug, Display};

/// On-disk numeric type of a raster sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl SampleType {
    /// Map a TIFF `SampleFormat` code (1 = unsigned, 2 = signed, 3 = IEEE float)
    /// and a bit depth to a sample type.
    pub fn from_tiff(sample_format: u32, bits: u32) -> Option<Self> {
        match (sample_format, bits) {
            (1, 8) => Some(SampleType::U8),
            (1, 16) => Some(SampleType::U16),
            (1, 32) => Some(SampleType::U32),
            (1, 64) => Some(SampleType::U64),
            (2, 8) => Some(SampleType::I8),
            (2, 16) => Some(SampleType::I16),
            (2, 32) => Some(SampleType::I32),
            (2, 64) => Some(SampleType::I64),
            (3, 32) => Some(SampleType::F32),
            (3, 64) => Some(SampleType::F64),
            _ => None,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            SampleType::I8 | SampleType::I16 | SampleType::I32 | SampleType::I64
        )
    }

    /// Width of one sample in bits
    pub fn bits(self) -> u32 {
        match self {
            SampleType::U8 | SampleType::I8 => 8,
            SampleType::U16 | SampleType::I16 => 16,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 32,
            SampleType::U64 | SampleType::I64 | SampleType::F64 => 64,
        }
    }

    /// Smallest type that holds every value of both `self` and `other`.
    ///
    /// Mixed signed and unsigned integers widen to a signed type (`u64`
    /// with any signed type becomes `f64`). `f32` only absorbs integers of
    /// up to 16 bits; anything wider promotes to `f64`.
    pub fn promote(self, other: Self) -> Self {
        if self == other {
            return self;
        }

        match (self.is_float(), other.is_float()) {
            // Two distinct float types: one of them is f64
            (true, true) => SampleType::F64,
            (true, false) | (false, true) => {
                let (float, int) = if self.is_float() { (self, other) } else { (other, self) };
                if float == SampleType::F32 && int.bits() <= 16 {
                    SampleType::F32
                } else {
                    SampleType::F64
                }
            }
            (false, false) if self.is_signed() == other.is_signed() => {
                if self.bits() >= other.bits() { self } else { other }
            }
            (false, false) => {
                let (signed, unsigned) = if self.is_signed() { (self, other) } else { (other, self) };
                if signed.bits() > unsigned.bits() {
                    return signed;
                }
                match unsigned.bits() {
                    8 => SampleType::I16,
                    16 => SampleType::I32,
                    32 => SampleType::I64,
                    _ => SampleType::F64,
                }
            }
        }
    }
}

impl Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::U8 => "u8",
            SampleType::U16 => "u16",
            SampleType::U32 => "u32",
            SampleType::U64 => "u64",
            SampleType::I8 => "i8",
            SampleType::I16 => "i16",
            SampleType::I32 => "i32",
            SampleType::I64 => "i64",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Trait for types that can be stored in a raster sample.
///
/// This trait bounds the types that can be used as raster values,
/// ensuring they support the comparisons and conversions the
/// statistics need.
pub trait RasterElement:
    Copy + Clone + Debug + Display + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Sample type this element decodes from
    const SAMPLE_TYPE: SampleType;

    /// Whether this value is NaN (always false for integers)
    fn is_nan(&self) -> bool;

    /// Whether this value is strictly below zero
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }
}

macro_rules! impl_raster_element_int {
    ($t:ty, $sample:ident) => {
        impl RasterElement for $t {
            const SAMPLE_TYPE: SampleType = SampleType::$sample;

            fn is_nan(&self) -> bool {
                false
            }
        }
    };
}

macro_rules! impl_raster_element_float {
    ($t:ty, $sample:ident) => {
        impl RasterElement for $t {
            const SAMPLE_TYPE: SampleType = SampleType::$sample;

            fn is_nan(&self) -> bool {
                <$t>::is_nan(*self)
            }
        }
    };
}

impl_raster_element_int!(i8, I8);
impl_raster_element_int!(i16, I16);
impl_raster_element_int!(i32, I32);
impl_raster_element_int!(i64, I64);
impl_raster_element_int!(u8, U8);
impl_raster_element_int!(u16, U16);
impl_raster_element_int!(u32, U32);
impl_raster_element_int!(u64, U64);
impl_raster_element_float!(f32, F32);
impl_raster_element_float!(f64, F64);
