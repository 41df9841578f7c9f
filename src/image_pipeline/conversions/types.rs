//! Conversion configuration and result types

use std::fmt;
use std::path::PathBuf;

use crate::image_pipeline::exr::ExrCompression;
use crate::image_pipeline::pixel::{PixelType, TypeSubstitution};
use crate::image_pipeline::tiff::TiffCompression;

/// Configuration shared by every conversion direction
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Sample type written to the destination; `None` keeps the first plane's type
    pub output_pixel_type: Option<PixelType>,
    /// Compression used when the destination is EXR
    pub exr_compression: ExrCompression,
    /// Compression used when the destination is TIFF
    pub tiff_compression: TiffCompression,
    /// Emit and record precision warnings
    pub verbose: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_pixel_type: None,
            exr_compression: ExrCompression::Zip,
            tiff_compression: TiffCompression::None,
            verbose: false,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    output_pixel_type: Option<Option<PixelType>>,
    exr_compression: Option<ExrCompression>,
    tiff_compression: Option<TiffCompression>,
    verbose: Option<bool>,
}

impl ConversionConfigBuilder {
    pub fn output_pixel_type(mut self, pixel_type: Option<PixelType>) -> Self {
        self.output_pixel_type = Some(pixel_type);
        self
    }

    pub fn exr_compression(mut self, compression: ExrCompression) -> Self {
        self.exr_compression = Some(compression);
        self
    }

    pub fn tiff_compression(mut self, compression: TiffCompression) -> Self {
        self.tiff_compression = Some(compression);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            output_pixel_type: self.output_pixel_type.unwrap_or(default.output_pixel_type),
            exr_compression: self.exr_compression.unwrap_or(default.exr_compression),
            tiff_compression: self.tiff_compression.unwrap_or(default.tiff_compression),
            verbose: self.verbose.unwrap_or(default.verbose),
        }
    }
}

/// One file conversion: where to read, where to write, and how.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
    pub config: ConversionConfig,
}

impl ConversionRequest {
    pub fn new(source_path: impl Into<PathBuf>, destination_path: impl Into<PathBuf>, config: ConversionConfig) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            config,
        }
    }
}

/// Warnings surfaced to the caller when `verbose` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    PrecisionSubstitution(TypeSubstitution),
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::PrecisionSubstitution(substitution) => substitution.fmt(f),
        }
    }
}

/// Outcome of a single successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    /// Number of planes written to the destination
    pub planes_written: usize,
    /// Source plane indices left out for shape or type mismatch
    pub dropped_planes: Vec<usize>,
    /// Sample type actually written
    pub output_type: PixelType,
    /// FLOAT16 replaced by a wider type, recorded whether or not it was reported
    pub substitution: Option<TypeSubstitution>,
    /// Warnings emitted during the run, empty unless `verbose`
    pub warnings: Vec<ConversionWarning>,
    /// Whether foreign headers were carried through the side-channel
    pub metadata_carried: bool,
}

/// Outcome of a directory conversion.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    /// Files without a compatible 2D image, with the reason
    pub skipped: Vec<(PathBuf, String)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.skipped.len() + self.failed.len()
    }
}
