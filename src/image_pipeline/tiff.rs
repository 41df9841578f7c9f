//! TIFF container module
//!
//! Multi-page grayscale TIFF reading and writing with ASCII tag preservation.

pub mod tags;
mod tiff_reader;
mod tiff_writer;
pub mod types;

pub use tiff_reader::TiffReader;
pub use tiff_writer::TiffWriter;
pub use types::TiffCompression;
