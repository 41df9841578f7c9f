//! Plane module
//!
//! Decoded 2D planes and the compatibility selector.

mod selector;
pub mod types;

pub use selector::{Selection, select_compatible};
pub use types::{Plane, PlaneCandidate};
