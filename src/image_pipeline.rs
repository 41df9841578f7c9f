//! Image processing pipeline module
//!
//! Converts between EXR, FITS and TIFF containers. Container codecs decode
//! files into planes and encode planes back; the conversion pipeline selects
//! compatible planes, coerces their samples and carries foreign headers
//! through an EXR side-channel.

pub mod common;
pub mod container;
pub mod conversions;
pub mod exr;
pub mod fits;
pub mod pixel;
pub mod plane;
pub mod side_channel;
pub mod tiff;

pub use common::{
    ConversionError,
    Result,
};

pub use pixel::{
    ContainerFormat,
    PixelBuffer,
    PixelType,
    TypeSubstitution,
    coerce,
};

pub use plane::{
    Plane,
    select_compatible,
};

pub use side_channel::HeaderSideChannel;

pub use container::{
    ContainerReader,
    ContainerWriter,
    ImageContainer,
};

pub use exr::{ExrCompression, ExrReader, ExrWriter};
pub use fits::{FitsReader, FitsWriter};
pub use tiff::{TiffCompression, TiffReader, TiffWriter};

pub use conversions::{
    BatchReport,
    ConversionConfig,
    ConversionConfigBuilder,
    ConversionPipeline,
    ConversionReport,
    ConversionRequest,
    ConversionWarning,
    ExrToFitsPipeline,
    ExrToTiffPipeline,
    FitsToExrPipeline,
    TiffToExrPipeline,
    convert_request,
};
