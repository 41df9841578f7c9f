//! Lookup between [`PixelType`] and each container's native sample encoding.
//!
//! The table is explicit: any combination not listed here is
//! `UnsupportedEncoding`, never a silent fallback. The single exception is
//! output-type resolution, which substitutes FLOAT32 for FLOAT16 on
//! containers without half-precision samples and records the substitution.

use std::fmt;
use std::path::Path;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::pixel::types::PixelType;

/// Container formats the converters read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Exr,
    Fits,
    Tiff,
}

impl ContainerFormat {
    pub fn name(self) -> &'static str {
        match self {
            ContainerFormat::Exr => "EXR",
            ContainerFormat::Fits => "FITS",
            ContainerFormat::Tiff => "TIFF",
        }
    }

    /// EXR attribute under which this format's per-plane headers are carried.
    pub fn side_channel_key(self) -> Option<&'static str> {
        match self {
            ContainerFormat::Exr => None,
            ContainerFormat::Fits => Some(crate::image_pipeline::side_channel::FITS_HEADERS_KEY),
            ContainerFormat::Tiff => Some(crate::image_pipeline::side_channel::TIFF_HEADERS_KEY),
        }
    }

    /// File name suffixes recognized for this format. Matching is exact and case-sensitive.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ContainerFormat::Exr => &[".exr"],
            ContainerFormat::Fits => &[".fits"],
            ContainerFormat::Tiff => &[".tif", ".tiff"],
        }
    }

    /// Suffix used for files this format writes.
    pub fn output_extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// The matched suffix, if `path` ends with one of this format's extensions.
    pub fn matching_extension(self, path: &Path) -> Option<&'static str> {
        let file_name = path.file_name()?.to_str()?;
        self.extensions()
            .iter()
            .copied()
            .find(|extension| file_name.ends_with(extension))
    }

    pub fn from_path(path: &Path) -> Option<ContainerFormat> {
        [ContainerFormat::Exr, ContainerFormat::Fits, ContainerFormat::Tiff]
            .into_iter()
            .find(|format| format.matching_extension(path).is_some())
    }

    pub fn supports_half(self) -> bool {
        pixeltype_to_native(self, PixelType::Float16).is_ok()
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// FITS sample encoding: the BITPIX value plus whether the BZERO offset
/// convention for unsigned 16-bit or signed 8-bit data applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitsEncoding {
    pub bitpix: i64,
    pub offset: bool,
}

impl FitsEncoding {
    pub fn plain(bitpix: i64) -> Self {
        Self { bitpix, offset: false }
    }

    pub fn bytes_per_sample(self) -> usize {
        (self.bitpix.unsigned_abs() / 8) as usize
    }

    /// BZERO written alongside the data when the offset convention applies.
    pub fn bzero(self) -> Option<i64> {
        match (self.bitpix, self.offset) {
            (16, true) => Some(32768),
            (8, true) => Some(-128),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExrSampleType {
    Half,
    Float,
    Uint,
}

/// TIFF SampleFormat tag combined with BitsPerSample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffSampleFormat {
    Uint(u8),
    Int(u8),
    Float(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEncoding {
    Fits(FitsEncoding),
    Exr(ExrSampleType),
    Tiff(TiffSampleFormat),
}

impl NativeEncoding {
    pub fn format(self) -> ContainerFormat {
        match self {
            NativeEncoding::Fits(_) => ContainerFormat::Fits,
            NativeEncoding::Exr(_) => ContainerFormat::Exr,
            NativeEncoding::Tiff(_) => ContainerFormat::Tiff,
        }
    }
}

fn unsupported_native(native: NativeEncoding) -> ConversionError {
    ConversionError::UnsupportedEncoding(format!(
        "{} encoding {:?} has no pixel type",
        native.format(),
        native
    ))
}

pub fn native_to_pixeltype(native: NativeEncoding) -> Result<PixelType> {
    let pixel_type = match native {
        NativeEncoding::Fits(encoding) => match (encoding.bitpix, encoding.offset) {
            (8, _) => PixelType::Int8,
            (16, false) => PixelType::Int16,
            (16, true) => PixelType::Uint16,
            (32, false) => PixelType::Int32,
            (-32, false) => PixelType::Float32,
            (-64, false) => PixelType::Float64,
            _ => return Err(unsupported_native(native)),
        },
        NativeEncoding::Exr(sample_type) => match sample_type {
            ExrSampleType::Half => PixelType::Float16,
            ExrSampleType::Float => PixelType::Float32,
            ExrSampleType::Uint => return Err(unsupported_native(native)),
        },
        NativeEncoding::Tiff(format) => match format {
            TiffSampleFormat::Int(8) => PixelType::Int8,
            TiffSampleFormat::Int(16) => PixelType::Int16,
            TiffSampleFormat::Int(32) => PixelType::Int32,
            // 8-bit unsigned pages widen losslessly into the nearest unsigned type.
            TiffSampleFormat::Uint(8) | TiffSampleFormat::Uint(16) => PixelType::Uint16,
            TiffSampleFormat::Float(32) => PixelType::Float32,
            TiffSampleFormat::Float(64) => PixelType::Float64,
            _ => return Err(unsupported_native(native)),
        },
    };
    Ok(pixel_type)
}

pub fn pixeltype_to_native(format: ContainerFormat, pixel_type: PixelType) -> Result<NativeEncoding> {
    let native = match format {
        ContainerFormat::Fits => match pixel_type {
            PixelType::Int8 => Some(FitsEncoding { bitpix: 8, offset: true }),
            PixelType::Int16 => Some(FitsEncoding::plain(16)),
            PixelType::Int32 => Some(FitsEncoding::plain(32)),
            PixelType::Uint16 => Some(FitsEncoding { bitpix: 16, offset: true }),
            PixelType::Float32 => Some(FitsEncoding::plain(-32)),
            PixelType::Float64 => Some(FitsEncoding::plain(-64)),
            PixelType::Float16 => None,
        }
        .map(NativeEncoding::Fits),
        ContainerFormat::Exr => match pixel_type {
            PixelType::Float16 => Some(ExrSampleType::Half),
            PixelType::Float32 => Some(ExrSampleType::Float),
            _ => None,
        }
        .map(NativeEncoding::Exr),
        ContainerFormat::Tiff => match pixel_type {
            PixelType::Int8 => Some(TiffSampleFormat::Int(8)),
            PixelType::Int16 => Some(TiffSampleFormat::Int(16)),
            PixelType::Int32 => Some(TiffSampleFormat::Int(32)),
            PixelType::Uint16 => Some(TiffSampleFormat::Uint(16)),
            PixelType::Float32 => Some(TiffSampleFormat::Float(32)),
            PixelType::Float64 => Some(TiffSampleFormat::Float(64)),
            PixelType::Float16 => None,
        }
        .map(NativeEncoding::Tiff),
    };

    native.ok_or_else(|| {
        ConversionError::UnsupportedEncoding(format!("{} cannot store {} samples", format, pixel_type))
    })
}

/// A FLOAT16 request replaced by a wider type the destination can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSubstitution {
    pub requested: PixelType,
    pub written: PixelType,
    pub format: ContainerFormat,
}

impl fmt::Display for TypeSubstitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} does not support {} images. Converted to {} instead.",
            self.format, self.requested, self.written
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputResolution {
    pub output_type: PixelType,
    pub substitution: Option<TypeSubstitution>,
}

/// Decides the encoding actually written to `format` for a `requested` type.
pub fn resolve_output_type(format: ContainerFormat, requested: PixelType) -> Result<OutputResolution> {
    match pixeltype_to_native(format, requested) {
        Ok(_) => Ok(OutputResolution {
            output_type: requested,
            substitution: None,
        }),
        Err(_) if requested == PixelType::Float16 => Ok(OutputResolution {
            output_type: PixelType::Float32,
            substitution: Some(TypeSubstitution {
                requested,
                written: PixelType::Float32,
                format,
            }),
        }),
        Err(e) => Err(e),
    }
}
