//! FITS reader
//!
//! Walks the primary HDU and every following extension. Each HDU holding a
//! 2D image becomes one candidate plane; its complete header, structural
//! cards and `END` included, is attached to the plane as the header blob.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerReader, ImageContainer};
use crate::image_pipeline::fits::card::{self, BLOCK_SIZE, Card};
use crate::image_pipeline::pixel::{
    ContainerFormat, FitsEncoding, NativeEncoding, PixelBuffer, PixelType, native_to_pixeltype,
};
use crate::image_pipeline::plane::Plane;

#[derive(Debug, Default, Clone, Copy)]
pub struct FitsReader;

/// Structural values of one HDU header.
#[derive(Debug)]
struct HduLayout {
    extension: Option<String>,
    bitpix: i64,
    axes: Vec<usize>,
    pcount: usize,
    gcount: usize,
    bzero: Option<f64>,
    bscale: Option<f64>,
}

impl HduLayout {
    fn from_cards(cards: &[Card]) -> Result<Self> {
        let integer = |keyword: &str| card::find(cards, keyword).and_then(Card::integer_value);
        let real = |keyword: &str| card::find(cards, keyword).and_then(Card::real_value);

        let bitpix = integer("BITPIX")
            .ok_or_else(|| ConversionError::DecodeError("HDU has no BITPIX".to_string()))?;
        let naxis = integer("NAXIS")
            .ok_or_else(|| ConversionError::DecodeError("HDU has no NAXIS".to_string()))?;

        let mut axes = Vec::new();
        for axis in 1..=naxis {
            let length = integer(format!("NAXIS{}", axis).as_str())
                .and_then(|value| usize::try_from(value).ok())
                .ok_or_else(|| ConversionError::DecodeError(format!("invalid NAXIS{}", axis)))?;
            axes.push(length);
        }

        let count = |keyword: &str, default: usize| {
            integer(keyword).map_or(Ok(default), |value| {
                usize::try_from(value).map_err(|_| ConversionError::DecodeError(format!("invalid {}", keyword)))
            })
        };

        Ok(Self {
            extension: card::find(cards, "XTENSION").and_then(Card::string_value),
            bitpix,
            axes,
            pcount: count("PCOUNT", 0)?,
            gcount: count("GCOUNT", 1)?,
            bzero: real("BZERO"),
            bscale: real("BSCALE"),
        })
    }

    /// Size of the data unit in bytes, before block padding.
    fn data_len(&self) -> Result<usize> {
        if self.axes.is_empty() {
            return Ok(0);
        }
        let overflow = || ConversionError::DecodeError("HDU data size overflows".to_string());

        let elements = self
            .axes
            .iter()
            .try_fold(1usize, |acc, &axis| acc.checked_mul(axis))
            .and_then(|product| product.checked_add(self.pcount))
            .and_then(|n| n.checked_mul(self.gcount))
            .ok_or_else(overflow)?;

        elements
            .checked_mul((self.bitpix.unsigned_abs() / 8) as usize)
            .ok_or_else(overflow)
    }

    fn is_image_2d(&self) -> bool {
        let image_extension = match &self.extension {
            None => true,
            Some(name) => name == "IMAGE",
        };
        image_extension && self.axes.len() == 2 && self.axes.iter().all(|&axis| axis > 0)
    }

    /// Only the unsigned 16-bit and signed 8-bit offset conventions are recognized.
    fn encoding(&self) -> FitsEncoding {
        let unit_scale = self.bscale.is_none_or(|scale| scale == 1.0);
        let offset = unit_scale
            && match (self.bitpix, self.bzero) {
                (16, Some(zero)) => zero == 32768.0,
                (8, Some(zero)) => zero == -128.0,
                _ => false,
            };

        if !offset && (self.bzero.is_some() || self.bscale.is_some()) {
            debug!("Ignoring BZERO/BSCALE scaling on BITPIX {} data", self.bitpix);
        }

        FitsEncoding {
            bitpix: self.bitpix,
            offset,
        }
    }
}

impl ContainerReader for FitsReader {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Fits
    }

    fn read_container(&self, data: &[u8]) -> Result<ImageContainer> {
        debug!("Decoding FITS file, {} bytes", data.len());

        if data.len() < BLOCK_SIZE || !data.starts_with(b"SIMPLE  =") {
            return Err(ConversionError::SourceUnreadable(
                "missing FITS primary header".to_string(),
            ));
        }

        let mut planes = Vec::new();
        let mut offset = 0;
        let mut hdu_index = 0;

        loop {
            let (cards, header_len) = card::read_header(&data[offset..])?;
            let layout = HduLayout::from_cards(&cards)?;

            let data_start = offset + header_len;
            let data_len = layout.data_len()?;
            let data_end = data_start
                .checked_add(data_len)
                .filter(|&end| end <= data.len())
                .ok_or_else(|| {
                    ConversionError::DecodeError(format!("HDU {} data is truncated", hdu_index))
                })?;

            if layout.is_image_2d() {
                let plane = decode_plane(&layout, &cards, &data[data_start..data_end], planes.len(), hdu_index)?;
                planes.push(plane);
            } else {
                debug!(
                    "Skipping HDU {}: {:?} with {} axes",
                    hdu_index,
                    layout.extension.as_deref().unwrap_or("PRIMARY"),
                    layout.axes.len()
                );
            }

            offset = data_start + data_len.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
            hdu_index += 1;

            if offset >= data.len() || !data[offset..].starts_with(b"XTENSION") {
                break;
            }
        }

        debug!("Decoded {} FITS image HDUs out of {}", planes.len(), hdu_index);

        Ok(ImageContainer::new(planes))
    }
}

fn decode_plane(layout: &HduLayout, cards: &[Card], bytes: &[u8], origin_index: usize, hdu_index: usize) -> Result<Plane> {
    let encoding = layout.encoding();
    let pixel_type = native_to_pixeltype(NativeEncoding::Fits(encoding))?;
    let samples = decode_samples(bytes, pixel_type, encoding.offset)?;

    let name = card::find(cards, "EXTNAME")
        .and_then(Card::string_value)
        .unwrap_or_else(|| format!("HDU{}", hdu_index));

    // FITS stores the fastest-varying axis first.
    let plane = Plane::new(layout.axes[0], layout.axes[1], samples, origin_index, name)?;
    Ok(plane.with_header(Some(card::header_blob(cards))))
}

fn decode_samples(bytes: &[u8], pixel_type: PixelType, offset: bool) -> Result<PixelBuffer> {
    let buffer = match pixel_type {
        PixelType::Int8 => {
            let flip = if offset { 0x80 } else { 0x00 };
            PixelBuffer::Int8(bytes.iter().map(|&b| (b ^ flip) as i8).collect())
        }
        PixelType::Int16 => PixelBuffer::Int16(
            bytes.chunks_exact(2).map(|c| i16::from_be_bytes([c[0], c[1]])).collect(),
        ),
        PixelType::Uint16 => PixelBuffer::Uint16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]]) ^ 0x8000)
                .collect(),
        ),
        PixelType::Int32 => PixelBuffer::Int32(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        PixelType::Float32 => PixelBuffer::Float32(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        PixelType::Float64 => PixelBuffer::Float64(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                .collect(),
        ),
        PixelType::Float16 => {
            return Err(ConversionError::UnsupportedEncoding(
                "FITS has no half-precision samples".to_string(),
            ));
        }
    };
    Ok(buffer)
}
