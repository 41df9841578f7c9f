//! EXR container module
//!
//! Reads and writes OpenEXR files through the `exr` crate and carries the
//! header side-channel as a text attribute.

mod exr_reader;
mod exr_writer;
pub mod types;

pub use exr_reader::ExrReader;
pub use exr_writer::ExrWriter;
pub use types::ExrCompression;
