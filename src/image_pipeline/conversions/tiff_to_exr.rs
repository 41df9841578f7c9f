use std::path::Path;

use crate::image_pipeline::{
    common::error::Result,
    conversions::{
        pipeline::ConversionPipeline,
        types::{BatchReport, ConversionConfig, ConversionReport},
    },
    exr::ExrWriter,
    tiff::TiffReader,
};

/// TIFF grayscale pages to EXR channels, keeping ASCII tags in `tiff_headers`.
pub type TiffToExrPipeline = ConversionPipeline<TiffReader, ExrWriter>;

pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q, config: &ConversionConfig) -> Result<ConversionReport> {
    TiffToExrPipeline::new(config.clone()).convert_file(source, destination)
}

pub fn convert_directory<P: AsRef<Path>>(directory: P, config: &ConversionConfig) -> Result<BatchReport> {
    TiffToExrPipeline::new(config.clone()).convert_directory(directory)
}
