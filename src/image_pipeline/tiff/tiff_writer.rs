use std::io::{Cursor, Seek, Write};

use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::{TiffEncoder, TiffValue};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerWriter, ImageContainer};
use crate::image_pipeline::conversions::ConversionConfig;
use crate::image_pipeline::pixel::{ContainerFormat, PixelBuffer};
use crate::image_pipeline::plane::Plane;
use crate::image_pipeline::tiff::tags::decode_tags;

/// Writes one grayscale page per plane.
#[derive(Debug, Default, Clone, Copy)]
pub struct TiffWriter;

impl ContainerWriter for TiffWriter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Tiff
    }

    fn write_container(&self, container: &ImageContainer, output: &mut dyn Write, config: &ConversionConfig) -> Result<()> {
        debug!(
            "Encoding TIFF file: {} pages, compression {}",
            container.planes.len(),
            config.tiff_compression
        );

        let mut buffer = Vec::new();

        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(config.tiff_compression.to_tiff());

        for plane in &container.planes {
            match &plane.samples {
                PixelBuffer::Int8(data) => write_page::<colortype::GrayI8, _>(&mut encoder, plane, data)?,
                PixelBuffer::Int16(data) => write_page::<colortype::GrayI16, _>(&mut encoder, plane, data)?,
                PixelBuffer::Int32(data) => write_page::<colortype::GrayI32, _>(&mut encoder, plane, data)?,
                PixelBuffer::Uint16(data) => write_page::<colortype::Gray16, _>(&mut encoder, plane, data)?,
                PixelBuffer::Float32(data) => write_page::<colortype::Gray32Float, _>(&mut encoder, plane, data)?,
                PixelBuffer::Float64(data) => write_page::<colortype::Gray64Float, _>(&mut encoder, plane, data)?,
                PixelBuffer::Float16(_) => {
                    return Err(ConversionError::UnsupportedEncoding(
                        "TIFF cannot store FLOAT16 samples".to_string(),
                    ));
                }
            }
        }

        drop(encoder);
        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

fn write_page<C, W>(encoder: &mut TiffEncoder<W>, plane: &Plane, data: &[C::Inner]) -> Result<()>
where
    C: ColorType,
    W: Write + Seek,
    [C::Inner]: TiffValue,
{
    let tags = match plane.attached_header.as_deref() {
        Some(blob) => decode_tags(blob)?,
        None => Vec::new(),
    };

    let mut image = encoder
        .new_image::<C>(plane.width as u32, plane.height as u32)
        .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

    for (tag, value) in &tags {
        if !value.is_ascii() || value.contains('\0') {
            debug!("Skipping TIFF tag {:?}: value is not plain ASCII", tag);
            continue;
        }
        image
            .encoder()
            .write_tag(*tag, value.as_str())
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
    }

    image
        .write_data(data)
        .map_err(|e| ConversionError::EncodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::container::ContainerReader;
    use crate::image_pipeline::tiff::{TiffCompression, TiffReader};
    use crate::image_pipeline::tiff::tags::encode_tags;

    fn round_trip(container: &ImageContainer, config: &ConversionConfig) -> ImageContainer {
        let mut out = Vec::new();
        TiffWriter.write_container(container, &mut out, config).unwrap();
        TiffReader.read_container(&out).unwrap()
    }

    #[test]
    fn pages_round_trip_with_types() {
        let buffers = vec![
            PixelBuffer::Int8(vec![-128, -1, 0, 127]),
            PixelBuffer::Int16(vec![-32768, -1, 0, 32767]),
            PixelBuffer::Int32(vec![i32::MIN, -1, 0, i32::MAX]),
            PixelBuffer::Uint16(vec![0, 1, 32768, 65535]),
            PixelBuffer::Float32(vec![-1.5, 0.0, 2.25, 1e30]),
            PixelBuffer::Float64(vec![-1.5, 0.0, 2.25, 1e300]),
        ];
        let planes: Vec<Plane> = buffers
            .iter()
            .enumerate()
            .map(|(i, samples)| Plane::new(2, 2, samples.clone(), i, i.to_string()).unwrap())
            .collect();

        let decoded = round_trip(&ImageContainer::new(planes), &ConversionConfig::default());

        let samples: Vec<PixelBuffer> = decoded.planes.into_iter().map(|p| p.samples).collect();
        assert_eq!(samples, buffers);
    }

    #[test]
    fn ascii_tags_are_restored() {
        let blob = encode_tags(&[(270, "dark frame".to_string()), (305, "acquire 2.1".to_string())]);
        let plane = Plane::new(2, 1, PixelBuffer::Uint16(vec![1, 2]), 0, "0")
            .unwrap()
            .with_header(Some(blob.clone()));

        let config = ConversionConfig::builder()
            .tiff_compression(TiffCompression::Lzw)
            .build();
        let decoded = round_trip(&ImageContainer::new(vec![plane]), &config);

        assert_eq!(decoded.planes[0].attached_header.as_deref(), Some(blob.as_str()));
        assert_eq!(decoded.planes[0].samples, PixelBuffer::Uint16(vec![1, 2]));
    }

    #[test]
    fn malformed_tag_blob_fails() {
        let plane = Plane::new(1, 1, PixelBuffer::Uint16(vec![1]), 0, "0")
            .unwrap()
            .with_header(Some("[1, 2]".to_string()));

        let err = TiffWriter
            .write_container(&ImageContainer::new(vec![plane]), &mut Vec::new(), &ConversionConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConversionError::MalformedSideChannel(_)));
    }
}
