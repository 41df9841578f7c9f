//! FITS container module
//!
//! A small block/card codec: primary HDU plus IMAGE extensions, 2880-byte
//! blocks, 80-column header cards and big-endian samples.

pub mod card;
mod fits_reader;
mod fits_writer;

pub use fits_reader::FitsReader;
pub use fits_writer::FitsWriter;
