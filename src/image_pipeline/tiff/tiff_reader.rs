//! Multi-page TIFF reader built on the `tiff` crate.
//!
//! Every single-channel grayscale page becomes a candidate plane. Its ASCII
//! tags are attached as a JSON tag blob.

use std::io::Cursor;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerReader, ImageContainer};
use crate::image_pipeline::pixel::{ContainerFormat, PixelBuffer};
use crate::image_pipeline::plane::Plane;
use crate::image_pipeline::tiff::tags::{ASCII_TAGS, encode_tags};

#[derive(Debug, Default, Clone, Copy)]
pub struct TiffReader;

impl ContainerReader for TiffReader {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Tiff
    }

    fn read_container(&self, data: &[u8]) -> Result<ImageContainer> {
        debug!("Decoding TIFF file, {} bytes", data.len());

        let mut decoder =
            Decoder::new(Cursor::new(data)).map_err(|e| ConversionError::SourceUnreadable(e.to_string()))?;

        let mut planes = Vec::new();
        let mut page = 0;

        loop {
            if let Some(plane) = read_page(&mut decoder, page, planes.len())? {
                planes.push(plane);
            }

            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(decode_error)?;
            page += 1;
        }

        debug!("Decoded {} grayscale TIFF pages out of {}", planes.len(), page + 1);

        Ok(ImageContainer::new(planes))
    }
}

fn decode_error(e: tiff::TiffError) -> ConversionError {
    ConversionError::DecodeError(e.to_string())
}

fn read_page(decoder: &mut Decoder<Cursor<&[u8]>>, page: usize, origin_index: usize) -> Result<Option<Plane>> {
    let (width, height) = decoder.dimensions().map_err(decode_error)?;

    match decoder.colortype().map_err(decode_error)? {
        ColorType::Gray(8 | 16 | 32 | 64) => {}
        other => {
            debug!("Skipping TIFF page {}: {:?}", page, other);
            return Ok(None);
        }
    }

    let samples = match decoder.read_image().map_err(decode_error)? {
        DecodingResult::U8(values) => PixelBuffer::Uint16(values.into_iter().map(u16::from).collect()),
        DecodingResult::U16(values) => PixelBuffer::Uint16(values),
        DecodingResult::I8(values) => PixelBuffer::Int8(values),
        DecodingResult::I16(values) => PixelBuffer::Int16(values),
        DecodingResult::I32(values) => PixelBuffer::Int32(values),
        DecodingResult::F32(values) => PixelBuffer::Float32(values),
        DecodingResult::F64(values) => PixelBuffer::Float64(values),
        _ => {
            return Err(ConversionError::UnsupportedEncoding(format!(
                "TIFF page {} sample format has no pixel type",
                page
            )));
        }
    };

    let mut tags = Vec::new();
    for (tag, code) in ASCII_TAGS {
        match decoder.find_tag(tag) {
            Ok(Some(value)) => match value.into_string() {
                Ok(text) => tags.push((code, text)),
                Err(_) => debug!("Skipping non-ASCII value of TIFF tag {}", code),
            },
            Ok(None) => {}
            Err(e) => debug!("Skipping unreadable TIFF tag {}: {}", code, e),
        }
    }

    let plane = Plane::new(width as usize, height as usize, samples, origin_index, format!("page{}", page))?;
    Ok(Some(plane.with_header(Some(encode_tags(&tags)))))
}
