use std::io::{Cursor, Write};

use exr::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerWriter, ImageContainer};
use crate::image_pipeline::conversions::ConversionConfig;
use crate::image_pipeline::pixel::{ContainerFormat, PixelBuffer, pixeltype_to_native};
use crate::image_pipeline::plane::Plane;

/// Writes all planes as channels `"0"`, `"1"`, ... of a single scan-line layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExrWriter;

impl ContainerWriter for ExrWriter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Exr
    }

    fn write_container(&self, container: &ImageContainer, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        let first = container.planes.first().ok_or_else(|| {
            ConversionError::NoImageData("no planes to write".to_string())
        })?;
        let (width, height) = first.shape();

        debug!(
            "Encoding EXR image: {}x{}, {} channels, {}",
            width,
            height,
            container.planes.len(),
            config.exr_compression
        );

        let channels = container
            .planes
            .iter()
            .enumerate()
            .map(|(index, plane)| exr_channel(index, plane, (width, height)))
            .collect::<Result<Vec<_>>>()?;

        let mut attributes = LayerAttributes::default();
        for (key, value) in &container.attributes {
            let name = Text::new_or_none(key).ok_or_else(|| {
                ConversionError::EncodeError(format!("attribute name '{}' is not representable in EXR", key))
            })?;
            attributes
                .other
                .insert(name, AttributeValue::Text(Text::from_slice_unchecked(value.as_bytes())));
        }

        let encoding = Encoding {
            compression: config.exr_compression.to_exr(),
            ..Encoding::SMALL_LOSSLESS
        };

        let layer = Layer::new((width, height), attributes, encoding, AnyChannels::sort(channels.into()));
        let image = Image::from_layer(layer);

        let mut buffer = Vec::new();
        image
            .write()
            .to_buffered(Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("EXR encoding complete");
        Ok(())
    }
}

fn exr_channel(index: usize, plane: &Plane, shape: (usize, usize)) -> Result<AnyChannel<FlatSamples>> {
    if plane.shape() != shape {
        return Err(ConversionError::InvalidDimensions(plane.width, plane.height));
    }

    pixeltype_to_native(ContainerFormat::Exr, plane.native_type())?;

    let samples = match &plane.samples {
        PixelBuffer::Float16(values) => FlatSamples::F16(values.clone()),
        PixelBuffer::Float32(values) => FlatSamples::F32(values.clone()),
        other => {
            return Err(ConversionError::UnsupportedEncoding(format!(
                "EXR cannot store {} samples",
                other.pixel_type()
            )));
        }
    };

    Ok(AnyChannel::new(index.to_string().as_str(), samples))
}
