use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::types::ImageContainer;
use crate::image_pipeline::conversions::ConversionConfig;
use crate::image_pipeline::pixel::ContainerFormat;

pub trait ContainerWriter {
    fn format(&self) -> ContainerFormat;
    fn write_container(&self, container: &ImageContainer, output: &mut dyn Write, config: &ConversionConfig) -> Result<()>;
}
