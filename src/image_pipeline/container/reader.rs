use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::container::types::ImageContainer;
use crate::image_pipeline::pixel::ContainerFormat;

pub trait ContainerReader {
    fn format(&self) -> ContainerFormat;
    fn read_container(&self, data: &[u8]) -> Result<ImageContainer>;
}
