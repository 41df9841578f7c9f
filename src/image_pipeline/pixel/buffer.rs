//! Typed sample buffers and the coercion between them.
//!
//! Coercion follows Rust `as` cast semantics: integer narrowing wraps,
//! float to integer saturates (NaN becomes 0), widening is exact.
//! Half-precision values are produced with a single rounding from `f64`
//! and read back through `f32`.

use half::f16;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::pixel::types::PixelType;

/// Row-major samples of one plane, tagged with their encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Uint16(Vec<u16>),
    Float16(Vec<f16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

macro_rules! cast_into {
    ($values:expr, $target:expr) => {{
        let values = $values;
        match $target {
            PixelType::Int8 => PixelBuffer::Int8(values.iter().map(|&v| v as i8).collect()),
            PixelType::Int16 => PixelBuffer::Int16(values.iter().map(|&v| v as i16).collect()),
            PixelType::Int32 => PixelBuffer::Int32(values.iter().map(|&v| v as i32).collect()),
            PixelType::Uint16 => PixelBuffer::Uint16(values.iter().map(|&v| v as u16).collect()),
            PixelType::Float16 => {
                PixelBuffer::Float16(values.iter().map(|&v| f16::from_f64(v as f64)).collect())
            }
            PixelType::Float32 => PixelBuffer::Float32(values.iter().map(|&v| v as f32).collect()),
            PixelType::Float64 => PixelBuffer::Float64(values.iter().map(|&v| v as f64).collect()),
        }
    }};
}

impl PixelBuffer {
    pub fn pixel_type(&self) -> PixelType {
        match self {
            PixelBuffer::Int8(_) => PixelType::Int8,
            PixelBuffer::Int16(_) => PixelType::Int16,
            PixelBuffer::Int32(_) => PixelType::Int32,
            PixelBuffer::Uint16(_) => PixelType::Uint16,
            PixelBuffer::Float16(_) => PixelType::Float16,
            PixelBuffer::Float32(_) => PixelType::Float32,
            PixelBuffer::Float64(_) => PixelType::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::Int8(v) => v.len(),
            PixelBuffer::Int16(v) => v.len(),
            PixelBuffer::Int32(v) => v.len(),
            PixelBuffer::Uint16(v) => v.len(),
            PixelBuffer::Float16(v) => v.len(),
            PixelBuffer::Float32(v) => v.len(),
            PixelBuffer::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every sample widened to `f64`. Exact for all seven encodings.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            PixelBuffer::Int8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::Int16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::Int32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::Uint16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::Float16(v) => v.iter().map(|x| x.to_f64()).collect(),
            PixelBuffer::Float32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::Float64(v) => v.clone(),
        }
    }

    /// Converts every sample to `target`, returning a new buffer.
    pub fn coerce(&self, target: PixelType) -> PixelBuffer {
        if self.pixel_type() == target {
            return self.clone();
        }

        match self {
            PixelBuffer::Int8(v) => cast_into!(v, target),
            PixelBuffer::Int16(v) => cast_into!(v, target),
            PixelBuffer::Int32(v) => cast_into!(v, target),
            PixelBuffer::Uint16(v) => cast_into!(v, target),
            PixelBuffer::Float16(v) => {
                let widened: Vec<f32> = v.iter().map(|x| x.to_f32()).collect();
                cast_into!(&widened, target)
            }
            PixelBuffer::Float32(v) => cast_into!(v, target),
            PixelBuffer::Float64(v) => cast_into!(v, target),
        }
    }
}

/// Converts `buffer` to `target`.
pub fn coerce(buffer: &PixelBuffer, target: PixelType) -> PixelBuffer {
    buffer.coerce(target)
}

/// Converts `buffer` to the encoding named by `target`, e.g. `"FLOAT32"`.
/// Unknown names fail with `UnsupportedEncoding`.
pub fn coerce_named(buffer: &PixelBuffer, target: &str) -> Result<PixelBuffer> {
    let target: PixelType = target.parse()?;
    Ok(buffer.coerce(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::common::error::ConversionError;

    #[test]
    fn same_type_is_identity() {
        let buffer = PixelBuffer::Float32(vec![1.5, -2.25, 3.0]);
        assert_eq!(buffer.coerce(PixelType::Float32), buffer);
    }

    #[test]
    fn every_pair_preserves_length_and_tag() {
        let sources = [
            PixelBuffer::Int8(vec![-3, 0, 7]),
            PixelBuffer::Int16(vec![-300, 0, 700]),
            PixelBuffer::Int32(vec![-70000, 0, 70000]),
            PixelBuffer::Uint16(vec![0, 1, 65535]),
            PixelBuffer::Float16(vec![f16::from_f32(0.5), f16::ZERO, f16::from_f32(-2.0)]),
            PixelBuffer::Float32(vec![0.5, 0.0, -2.0]),
            PixelBuffer::Float64(vec![0.5, 0.0, -2.0]),
        ];

        for source in &sources {
            for target in PixelType::ALL {
                let coerced = source.coerce(target);
                assert_eq!(coerced.pixel_type(), target);
                assert_eq!(coerced.len(), source.len());
            }
        }
    }

    #[test]
    fn integer_narrowing_wraps() {
        let buffer = PixelBuffer::Int32(vec![70000, -1]);
        assert_eq!(buffer.coerce(PixelType::Int16), PixelBuffer::Int16(vec![4464, -1]));
        assert_eq!(buffer.coerce(PixelType::Uint16), PixelBuffer::Uint16(vec![4464, 65535]));
    }

    #[test]
    fn float_to_integer_truncates_and_saturates() {
        let buffer = PixelBuffer::Float64(vec![1.9, -1.9, 1e9, f64::NAN]);
        assert_eq!(buffer.coerce(PixelType::Int16), PixelBuffer::Int16(vec![1, -1, i16::MAX, 0]));
    }

    #[test]
    fn half_round_trip_through_float32() {
        let buffer = PixelBuffer::Float32(vec![0.5, 1.0, 65504.0]);
        let half = buffer.coerce(PixelType::Float16);
        assert_eq!(half.coerce(PixelType::Float32), buffer);
    }

    #[test]
    fn half_loses_precision() {
        let buffer = PixelBuffer::Float32(vec![0.1]);
        let back = buffer.coerce(PixelType::Float16).coerce(PixelType::Float32);
        assert_ne!(back, buffer);
    }

    #[test]
    fn named_target() {
        let buffer = PixelBuffer::Int16(vec![1, 2]);
        let coerced = coerce_named(&buffer, "FLOAT64").unwrap();
        assert_eq!(coerced, PixelBuffer::Float64(vec![1.0, 2.0]));

        let err = coerce_named(&buffer, "COMPLEX64").unwrap_err();
        assert!(matches!(err, ConversionError::UnsupportedEncoding(_)));
    }
}
