//! EXR output configuration types

use std::fmt;
use std::str::FromStr;

use crate::image_pipeline::common::error::ConversionError;

/// EXR compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExrCompression {
    /// No compression
    None,
    /// Run-length encoding
    Rle,
    /// Zlib, one scan line per block
    Zips,
    /// Zlib, sixteen scan lines per block (default)
    #[default]
    Zip,
    /// Wavelet, lossless
    Piz,
    /// Lossy for 32-bit floats, lossless for halves
    Pxr24,
    /// Lossy 4x4 blocks for halves
    B44,
    /// B44 with flat-area optimization
    B44a,
    /// Lossy DCT, 32 scan lines per block
    Dwaa,
    /// Lossy DCT, 256 scan lines per block
    Dwab,
}

impl ExrCompression {
    pub const ALL: [ExrCompression; 10] = [
        ExrCompression::None,
        ExrCompression::Rle,
        ExrCompression::Zips,
        ExrCompression::Zip,
        ExrCompression::Piz,
        ExrCompression::Pxr24,
        ExrCompression::B44,
        ExrCompression::B44a,
        ExrCompression::Dwaa,
        ExrCompression::Dwab,
    ];

    pub fn token(self) -> &'static str {
        match self {
            ExrCompression::None => "NONE",
            ExrCompression::Rle => "RLE",
            ExrCompression::Zips => "ZIPS",
            ExrCompression::Zip => "ZIP",
            ExrCompression::Piz => "PIZ",
            ExrCompression::Pxr24 => "PXR24",
            ExrCompression::B44 => "B44",
            ExrCompression::B44a => "B44A",
            ExrCompression::Dwaa => "DWAA",
            ExrCompression::Dwab => "DWAB",
        }
    }

    pub(crate) fn to_exr(self) -> exr::compression::Compression {
        use exr::compression::Compression;

        match self {
            ExrCompression::None => Compression::Uncompressed,
            ExrCompression::Rle => Compression::RLE,
            ExrCompression::Zips => Compression::ZIP1,
            ExrCompression::Zip => Compression::ZIP16,
            ExrCompression::Piz => Compression::PIZ,
            ExrCompression::Pxr24 => Compression::PXR24,
            ExrCompression::B44 => Compression::B44,
            ExrCompression::B44a => Compression::B44A,
            ExrCompression::Dwaa => Compression::DWAA(None),
            ExrCompression::Dwab => Compression::DWAB(None),
        }
    }
}

impl fmt::Display for ExrCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for ExrCompression {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExrCompression::ALL
            .into_iter()
            .find(|compression| compression.token().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ConversionError::InvalidConfig(format!("unknown EXR compression '{}'", s))
            })
    }
}
