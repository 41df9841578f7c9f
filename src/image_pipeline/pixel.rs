//! Pixel encoding module
//!
//! Abstract sample types, the per-format mapping table, and buffer coercion.

mod buffer;
mod mapping;
pub mod types;

pub use buffer::{PixelBuffer, coerce, coerce_named};
pub use mapping::{
    ContainerFormat, ExrSampleType, FitsEncoding, NativeEncoding, OutputResolution,
    TiffSampleFormat, TypeSubstitution, native_to_pixeltype, pixeltype_to_native,
    resolve_output_type,
};
pub use types::{PixelType, SampleClass};
