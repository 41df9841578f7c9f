//! Decoded container contents

use std::collections::BTreeMap;

use crate::image_pipeline::plane::Plane;

/// Planes in container order plus the container's text attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageContainer {
    /// Every 2D plane found, in container order
    pub planes: Vec<Plane>,
    /// Text attributes stored at container level (EXR only)
    pub attributes: BTreeMap<String, String>,
}

impl ImageContainer {
    pub fn new(planes: Vec<Plane>) -> Self {
        Self {
            planes,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
