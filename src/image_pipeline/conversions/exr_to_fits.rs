use std::path::Path;

use crate::image_pipeline::{
    common::error::Result,
    conversions::{
        pipeline::ConversionPipeline,
        types::{BatchReport, ConversionConfig, ConversionReport},
    },
    exr::ExrReader,
    fits::FitsWriter,
};

/// EXR channels to FITS IMAGE extensions, restoring `fits_headers` cards.
pub type ExrToFitsPipeline = ConversionPipeline<ExrReader, FitsWriter>;

pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q, config: &ConversionConfig) -> Result<ConversionReport> {
    ExrToFitsPipeline::new(config.clone()).convert_file(source, destination)
}

pub fn convert_directory<P: AsRef<Path>>(directory: P, config: &ConversionConfig) -> Result<BatchReport> {
    ExrToFitsPipeline::new(config.clone()).convert_directory(directory)
}
