//! CLI argument definitions

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use exr_converter_rs::image_pipeline::conversions::{exr_to_fits, exr_to_tiff, fits_to_exr, tiff_to_exr};
use exr_converter_rs::image_pipeline::{
    BatchReport, ContainerFormat, ConversionConfig, ConversionReport, ExrCompression, PixelType,
    Result, TiffCompression,
};

#[derive(Parser)]
#[command(name = "exr-convert")]
#[command(about = "Convert images between OpenEXR, FITS and TIFF")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging and precision warnings
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert EXR channels to FITS image extensions
    #[command(name = "exr2fits")]
    ExrToFits(ConvertArgs),

    /// Convert FITS image HDUs to EXR channels
    #[command(name = "fits2exr")]
    FitsToExr(ConvertArgs),

    /// Convert EXR channels to TIFF pages
    #[command(name = "exr2tiff")]
    ExrToTiff(ConvertArgs),

    /// Convert TIFF pages to EXR channels
    #[command(name = "tiff2exr")]
    TiffToExr(ConvertArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Source file
    #[arg(required_unless_present = "dir", conflicts_with = "dir")]
    pub input: Option<PathBuf>,

    /// Convert every matching file in this directory instead
    #[arg(long, conflicts_with = "output")]
    pub dir: Option<PathBuf>,

    /// Destination file (defaults to the input with the new extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sample type to write: INT8, INT16, INT32, UINT16, FLOAT16, FLOAT32, FLOAT64
    #[arg(long)]
    pub pixel_type: Option<PixelType>,

    /// EXR compression: NONE, RLE, ZIPS, ZIP, PIZ, PXR24, B44, B44A, DWAA, DWAB
    #[arg(long)]
    pub compression: Option<ExrCompression>,

    /// TIFF compression: NONE, LZW, DEFLATE, DEFLATE_FAST, DEFLATE_BEST
    #[arg(long)]
    pub tiff_compression: Option<TiffCompression>,
}

impl ConvertArgs {
    pub fn config(&self, verbose: bool) -> ConversionConfig {
        let mut builder = ConversionConfig::builder()
            .output_pixel_type(self.pixel_type)
            .verbose(verbose);
        if let Some(compression) = self.compression {
            builder = builder.exr_compression(compression);
        }
        if let Some(compression) = self.tiff_compression {
            builder = builder.tiff_compression(compression);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Direction {
    ExrToFits,
    FitsToExr,
    ExrToTiff,
    TiffToExr,
}

impl Commands {
    pub fn split(&self) -> (Direction, &ConvertArgs) {
        match self {
            Commands::ExrToFits(args) => (Direction::ExrToFits, args),
            Commands::FitsToExr(args) => (Direction::FitsToExr, args),
            Commands::ExrToTiff(args) => (Direction::ExrToTiff, args),
            Commands::TiffToExr(args) => (Direction::TiffToExr, args),
        }
    }
}

impl Direction {
    pub fn source(self) -> ContainerFormat {
        match self {
            Direction::ExrToFits | Direction::ExrToTiff => ContainerFormat::Exr,
            Direction::FitsToExr => ContainerFormat::Fits,
            Direction::TiffToExr => ContainerFormat::Tiff,
        }
    }

    pub fn destination(self) -> ContainerFormat {
        match self {
            Direction::ExrToFits => ContainerFormat::Fits,
            Direction::ExrToTiff => ContainerFormat::Tiff,
            Direction::FitsToExr | Direction::TiffToExr => ContainerFormat::Exr,
        }
    }

    /// `input` with the source extension replaced by the destination's.
    pub fn default_output(self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = self
            .source()
            .matching_extension(input)
            .and_then(|extension| name.strip_suffix(extension))
            .unwrap_or(&name);
        input.with_file_name(format!("{}{}", stem, self.destination().output_extension()))
    }

    pub fn convert_file(self, input: &Path, output: &Path, config: &ConversionConfig) -> Result<ConversionReport> {
        match self {
            Direction::ExrToFits => exr_to_fits::convert(input, output, config),
            Direction::FitsToExr => fits_to_exr::convert(input, output, config),
            Direction::ExrToTiff => exr_to_tiff::convert(input, output, config),
            Direction::TiffToExr => tiff_to_exr::convert(input, output, config),
        }
    }

    pub fn convert_directory(self, directory: &Path, config: &ConversionConfig) -> Result<BatchReport> {
        match self {
            Direction::ExrToFits => exr_to_fits::convert_directory(directory, config),
            Direction::FitsToExr => fits_to_exr::convert_directory(directory, config),
            Direction::ExrToTiff => exr_to_tiff::convert_directory(directory, config),
            Direction::TiffToExr => tiff_to_exr::convert_directory(directory, config),
        }
    }
}
