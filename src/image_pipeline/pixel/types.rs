//! Abstract sample encodings, independent of any container format.

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// A sample encoding a plane can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelType {
    Int8,
    Int16,
    Int32,
    Uint16,
    Float16,
    Float32,
    Float64,
}

/// Numeric classification of a [`PixelType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleClass {
    SignedInteger,
    UnsignedInteger,
    Float,
}

impl PixelType {
    pub const ALL: [PixelType; 7] = [
        PixelType::Int8,
        PixelType::Int16,
        PixelType::Int32,
        PixelType::Uint16,
        PixelType::Float16,
        PixelType::Float32,
        PixelType::Float64,
    ];

    /// Bytes occupied by one sample.
    pub fn byte_width(self) -> usize {
        match self {
            PixelType::Int8 => 1,
            PixelType::Int16 | PixelType::Uint16 | PixelType::Float16 => 2,
            PixelType::Int32 | PixelType::Float32 => 4,
            PixelType::Float64 => 8,
        }
    }

    pub fn class(self) -> SampleClass {
        match self {
            PixelType::Int8 | PixelType::Int16 | PixelType::Int32 => SampleClass::SignedInteger,
            PixelType::Uint16 => SampleClass::UnsignedInteger,
            PixelType::Float16 | PixelType::Float32 | PixelType::Float64 => SampleClass::Float,
        }
    }

    pub fn is_float(self) -> bool {
        self.class() == SampleClass::Float
    }

    pub fn name(self) -> &'static str {
        match self {
            PixelType::Int8 => "INT8",
            PixelType::Int16 => "INT16",
            PixelType::Int32 => "INT32",
            PixelType::Uint16 => "UINT16",
            PixelType::Float16 => "FLOAT16",
            PixelType::Float32 => "FLOAT32",
            PixelType::Float64 => "FLOAT64",
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PixelType::ALL
            .into_iter()
            .find(|pixel_type| pixel_type.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConversionError::UnsupportedEncoding(format!("unknown pixel type '{}'", s)))
    }
}
