use std::io::Write;

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::container::{ContainerWriter, ImageContainer};
use crate::image_pipeline::conversions::ConversionConfig;
use crate::image_pipeline::fits::card::{self, Card};
use crate::image_pipeline::pixel::{
    ContainerFormat, FitsEncoding, NativeEncoding, PixelBuffer, PixelType, pixeltype_to_native,
};
use crate::image_pipeline::plane::Plane;

/// Writes an empty primary HDU followed by one IMAGE extension per plane.
#[derive(Debug, Default, Clone, Copy)]
pub struct FitsWriter;

impl ContainerWriter for FitsWriter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Fits
    }

    fn write_container(&self, container: &ImageContainer, output: &mut dyn Write, _config: &ConversionConfig) -> Result<()> {
        debug!("Encoding FITS file with {} image extensions", container.planes.len());

        let mut buffer = Vec::new();
        card::write_header(
            &[
                Card::logical("SIMPLE", true),
                Card::integer("BITPIX", 8),
                Card::integer("NAXIS", 0),
                Card::logical("EXTEND", true),
            ],
            &mut buffer,
        );

        for plane in &container.planes {
            write_extension(plane, &mut buffer)?;
        }

        output.write_all(&buffer)?;

        debug!("FITS encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

fn fits_encoding(pixel_type: PixelType) -> Result<FitsEncoding> {
    match pixeltype_to_native(ContainerFormat::Fits, pixel_type)? {
        NativeEncoding::Fits(encoding) => Ok(encoding),
        other => Err(ConversionError::UnsupportedEncoding(format!(
            "{:?} is not a FITS encoding",
            other
        ))),
    }
}

/// Header cards for one IMAGE extension.
///
/// The structural cards always describe the plane being written. When the
/// attached blob states a structural card with the same value, the blob's card
/// is kept verbatim (comments and formatting included); otherwise the
/// generated card replaces it. BZERO/BSCALE stay where the blob put them when
/// both agree. Every other carried card follows in blob order.
fn extension_cards(plane: &Plane, encoding: FitsEncoding) -> Result<Vec<Card>> {
    let carried = match plane.attached_header.as_deref() {
        Some(blob) => card::parse_blob(blob)?,
        None => Vec::new(),
    };
    let verbatim = |generated: Card| {
        carried
            .iter()
            .find(|card| card.states_same_value(&generated))
            .cloned()
            .unwrap_or(generated)
    };

    let mut cards: Vec<Card> = [
        Card::string("XTENSION", "IMAGE"),
        Card::integer("BITPIX", encoding.bitpix),
        Card::integer("NAXIS", 2),
        Card::integer("NAXIS1", plane.width as i64),
        Card::integer("NAXIS2", plane.height as i64),
        Card::integer("PCOUNT", 0),
        Card::integer("GCOUNT", 1),
    ]
    .into_iter()
    .map(verbatim)
    .collect();

    let scaling: Vec<Card> = match encoding.bzero() {
        Some(bzero) => vec![Card::integer("BZERO", bzero), Card::integer("BSCALE", 1)],
        None => Vec::new(),
    };
    let scaling_in_place = !scaling.is_empty()
        && scaling
            .iter()
            .all(|generated| carried.iter().any(|card| card.states_same_value(generated)));
    if !scaling_in_place {
        cards.extend(scaling.iter().cloned());
    }

    for card in carried {
        if !card.is_structural() {
            cards.push(card);
        } else if scaling_in_place
            && scaling.iter().any(|generated| card.states_same_value(generated))
            && card::find(&cards, card.keyword()).is_none()
        {
            cards.push(card);
        }
    }

    Ok(cards)
}

fn write_extension(plane: &Plane, out: &mut Vec<u8>) -> Result<()> {
    let encoding = fits_encoding(plane.native_type())?;
    let cards = extension_cards(plane, encoding)?;

    card::write_header(&cards, out);

    let start = out.len();
    encode_samples(&plane.samples, out)?;
    card::pad_block(out, start, 0);
    Ok(())
}

fn encode_samples(samples: &PixelBuffer, out: &mut Vec<u8>) -> Result<()> {
    match samples {
        PixelBuffer::Int8(values) => out.extend(values.iter().map(|&v| (v as u8) ^ 0x80)),
        PixelBuffer::Int16(values) => out.extend(values.iter().flat_map(|v| v.to_be_bytes())),
        PixelBuffer::Uint16(values) => out.extend(values.iter().flat_map(|&v| (v ^ 0x8000).to_be_bytes())),
        PixelBuffer::Int32(values) => out.extend(values.iter().flat_map(|v| v.to_be_bytes())),
        PixelBuffer::Float32(values) => out.extend(values.iter().flat_map(|v| v.to_be_bytes())),
        PixelBuffer::Float64(values) => out.extend(values.iter().flat_map(|v| v.to_be_bytes())),
        PixelBuffer::Float16(_) => {
            return Err(ConversionError::UnsupportedEncoding(
                "FITS cannot store FLOAT16 samples".to_string(),
            ));
        }
    }
    Ok(())
}
