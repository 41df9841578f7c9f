use std::path::Path;

use crate::image_pipeline::{
    common::error::Result,
    conversions::{
        pipeline::ConversionPipeline,
        types::{BatchReport, ConversionConfig, ConversionReport},
    },
    exr::ExrReader,
    tiff::TiffWriter,
};

/// EXR channels to TIFF pages, restoring `tiff_headers` tags.
pub type ExrToTiffPipeline = ConversionPipeline<ExrReader, TiffWriter>;

pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q, config: &ConversionConfig) -> Result<ConversionReport> {
    ExrToTiffPipeline::new(config.clone()).convert_file(source, destination)
}

pub fn convert_directory<P: AsRef<Path>>(directory: P, config: &ConversionConfig) -> Result<BatchReport> {
    ExrToTiffPipeline::new(config.clone()).convert_directory(directory)
}
