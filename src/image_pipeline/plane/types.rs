//! Decoded 2D image planes

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::pixel::{PixelBuffer, PixelType};

/// One decoded 2D image layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Width of the plane in pixels
    pub width: usize,
    /// Height of the plane in pixels
    pub height: usize,
    /// Row-major samples, `width * height` of them
    pub samples: PixelBuffer,
    /// Position within the source container's plane list
    pub origin_index: usize,
    /// Channel name, HDU name, or page label from the source container
    pub name: String,
    /// FITS header cards or serialized TIFF tags carried with this plane
    pub attached_header: Option<String>,
}

impl Plane {
    pub fn new(
        width: usize,
        height: usize,
        samples: PixelBuffer,
        origin_index: usize,
        name: impl Into<String>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || samples.len() != width * height {
            return Err(ConversionError::InvalidDimensions(width, height));
        }

        Ok(Self {
            width,
            height,
            samples,
            origin_index,
            name: name.into(),
            attached_header: None,
        })
    }

    pub fn with_header(mut self, header: Option<String>) -> Self {
        self.attached_header = header;
        self
    }

    pub fn native_type(&self) -> PixelType {
        self.samples.pixel_type()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// A copy of this plane with samples converted to `target`.
    pub fn coerced(&self, target: PixelType) -> Plane {
        Plane {
            samples: self.samples.coerce(target),
            ..self.clone()
        }
    }
}

/// What the selector needs to know about a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneCandidate {
    pub shape: (usize, usize),
    pub native_type: PixelType,
}

impl From<&Plane> for PlaneCandidate {
    fn from(plane: &Plane) -> Self {
        Self {
            shape: plane.shape(),
            native_type: plane.native_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_sample_count() {
        let err = Plane::new(4, 4, PixelBuffer::Float32(vec![0.0; 15]), 0, "0").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDimensions(4, 4)));
    }

    #[test]
    fn rejects_empty_plane() {
        let err = Plane::new(0, 4, PixelBuffer::Float32(Vec::new()), 0, "0").unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDimensions(0, 4)));
    }

    #[test]
    fn coercion_keeps_identity_fields() {
        let plane = Plane::new(2, 1, PixelBuffer::Int16(vec![1, -1]), 3, "SCI")
            .unwrap()
            .with_header(Some("header".to_string()));
        let coerced = plane.coerced(PixelType::Float32);

        assert_eq!(coerced.native_type(), PixelType::Float32);
        assert_eq!(coerced.origin_index, 3);
        assert_eq!(coerced.name, "SCI");
        assert_eq!(coerced.attached_header.as_deref(), Some("header"));
        assert_eq!(plane.native_type(), PixelType::Int16);
    }
}
