use std::path::Path;

use crate::image_pipeline::{
    common::error::Result,
    conversions::{
        pipeline::ConversionPipeline,
        types::{BatchReport, ConversionConfig, ConversionReport},
    },
    exr::ExrWriter,
    fits::FitsReader,
};

/// FITS image HDUs to EXR channels, keeping each HDU's cards in `fits_headers`.
pub type FitsToExrPipeline = ConversionPipeline<FitsReader, ExrWriter>;

pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q, config: &ConversionConfig) -> Result<ConversionReport> {
    FitsToExrPipeline::new(config.clone()).convert_file(source, destination)
}

pub fn convert_directory<P: AsRef<Path>>(directory: P, config: &ConversionConfig) -> Result<BatchReport> {
    FitsToExrPipeline::new(config.clone()).convert_directory(directory)
}
