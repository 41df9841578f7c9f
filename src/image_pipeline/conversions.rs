//! Pipeline conversions module
//!
//! One generic pipeline drives every direction; the direction modules pair
//! a reader with a writer and expose file and directory entry points.

mod batch;
pub mod exr_to_fits;
pub mod exr_to_tiff;
pub mod fits_to_exr;
mod pipeline;
pub mod tiff_to_exr;
pub mod types;

#[cfg(test)]
mod tests;

pub use exr_to_fits::ExrToFitsPipeline;
pub use exr_to_tiff::ExrToTiffPipeline;
pub use fits_to_exr::FitsToExrPipeline;
pub use pipeline::ConversionPipeline;
pub use tiff_to_exr::TiffToExrPipeline;
pub use types::{
    BatchReport, ConversionConfig, ConversionConfigBuilder, ConversionReport, ConversionRequest,
    ConversionWarning,
};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::pixel::ContainerFormat;

/// Runs `request`, choosing the direction from the two file extensions.
pub fn convert_request(request: &ConversionRequest) -> Result<ConversionReport> {
    let source = ContainerFormat::from_path(&request.source_path);
    let destination = ContainerFormat::from_path(&request.destination_path);

    let (src, dst, config) = (&request.source_path, &request.destination_path, &request.config);
    match (source, destination) {
        (Some(ContainerFormat::Exr), Some(ContainerFormat::Fits)) => exr_to_fits::convert(src, dst, config),
        (Some(ContainerFormat::Fits), Some(ContainerFormat::Exr)) => fits_to_exr::convert(src, dst, config),
        (Some(ContainerFormat::Exr), Some(ContainerFormat::Tiff)) => exr_to_tiff::convert(src, dst, config),
        (Some(ContainerFormat::Tiff), Some(ContainerFormat::Exr)) => tiff_to_exr::convert(src, dst, config),
        _ => Err(ConversionError::InvalidConfig(format!(
            "no converter from {} to {}",
            request.source_path.display(),
            request.destination_path.display()
        ))),
    }
}
