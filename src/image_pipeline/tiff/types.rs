//! TIFF output configuration types

use std::fmt;
use std::str::FromStr;

use tiff::encoder::compression::DeflateLevel;

use crate::image_pipeline::common::error::ConversionError;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file, default)
    #[default]
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - balanced
    DeflateBalanced,
    /// Deflate compression - best compression (slower)
    DeflateBest,
}

impl TiffCompression {
    pub const ALL: [TiffCompression; 5] = [
        TiffCompression::None,
        TiffCompression::Lzw,
        TiffCompression::DeflateFast,
        TiffCompression::DeflateBalanced,
        TiffCompression::DeflateBest,
    ];

    pub fn token(self) -> &'static str {
        match self {
            TiffCompression::None => "NONE",
            TiffCompression::Lzw => "LZW",
            TiffCompression::DeflateFast => "DEFLATE_FAST",
            TiffCompression::DeflateBalanced => "DEFLATE",
            TiffCompression::DeflateBest => "DEFLATE_BEST",
        }
    }

    pub(crate) fn to_tiff(self) -> tiff::encoder::Compression {
        use tiff::encoder::Compression;

        match self {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}

impl fmt::Display for TiffCompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TiffCompression {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TiffCompression::ALL
            .into_iter()
            .find(|compression| compression.token().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConversionError::InvalidConfig(format!("unknown TIFF compression '{}'", s)))
    }
}
