//! Container codec boundary
//!
//! Readers decode a whole file into ordered planes plus text attributes;
//! writers encode planes plus attributes back into a file.

mod reader;
pub mod types;
mod writer;

pub use reader::ContainerReader;
pub use types::ImageContainer;
pub use writer::ContainerWriter;
