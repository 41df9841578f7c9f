//! EXR reader built on the `exr` crate.
//!
//! Every flat channel of every layer becomes one candidate plane. Channels
//! inside a layer are ordered numerically when their names are integers
//! (the naming this crate writes), otherwise by name.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;

use exr::prelude::*;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerReader, ImageContainer};
use crate::image_pipeline::pixel::{ContainerFormat, PixelBuffer};
use crate::image_pipeline::plane::Plane;

#[derive(Debug, Default, Clone, Copy)]
pub struct ExrReader;

impl ContainerReader for ExrReader {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Exr
    }

    fn read_container(&self, data: &[u8]) -> Result<ImageContainer> {
        debug!("Decoding EXR image, {} bytes", data.len());

        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .all_channels()
            .all_layers()
            .all_attributes()
            .from_buffered(Cursor::new(data))
            .map_err(|e| ConversionError::SourceUnreadable(e.to_string()))?;

        let mut attributes = BTreeMap::new();
        collect_text_attributes(&image.attributes.other, &mut attributes);

        let mut planes = Vec::new();
        for layer in image.layer_data.iter() {
            collect_text_attributes(&layer.attributes.other, &mut attributes);

            let width = layer.size.width();
            let height = layer.size.height();

            let mut channels: Vec<_> = layer.channel_data.list.iter().collect();
            channels.sort_by(|a, b| channel_order(&a.name.to_string(), &b.name.to_string()));

            for channel in channels {
                let name = channel.name.to_string();

                if channel.sampling != Vec2(1, 1) {
                    debug!("Skipping subsampled channel {}", name);
                    continue;
                }

                let samples = match &channel.sample_data {
                    FlatSamples::F16(values) => PixelBuffer::Float16(values.clone()),
                    FlatSamples::F32(values) => PixelBuffer::Float32(values.clone()),
                    FlatSamples::U32(_) => {
                        return Err(ConversionError::UnsupportedEncoding(format!(
                            "EXR channel '{}' stores UINT samples",
                            name
                        )));
                    }
                };

                let plane = Plane::new(width, height, samples, planes.len(), name)?;
                planes.push(plane);
            }
        }

        debug!("Decoded {} EXR channels", planes.len());

        Ok(ImageContainer { planes, attributes })
    }
}

fn channel_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn collect_text_attributes(source: &HashMap<Text, AttributeValue>, into: &mut BTreeMap<String, String>) {
    for (name, value) in source {
        if let AttributeValue::Text(text) = value {
            // Values written by this crate are UTF-8; older files may hold Latin-1.
            let value = String::from_utf8(text.bytes().to_vec()).unwrap_or_else(|_| text.to_string());
            into.insert(name.to_string(), value);
        }
    }
}
