//! Per-plane foreign headers carried through an EXR text attribute.
//!
//! The attribute value is a JSON array of strings, one per plane in plane
//! order. An empty list is stored as `[]`, which is distinct from the
//! attribute being absent.

use std::collections::BTreeMap;

use crate::image_pipeline::common::error::{ConversionError, Result};

pub const FITS_HEADERS_KEY: &str = "fits_headers";
pub const TIFF_HEADERS_KEY: &str = "tiff_headers";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSideChannel {
    headers: Vec<String>,
}

impl HeaderSideChannel {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn into_headers(self) -> Vec<String> {
        self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn encode(&self) -> String {
        serde_json::Value::from(self.headers.clone()).to_string()
    }

    pub fn decode(blob: &str) -> Result<Self> {
        let headers: Vec<String> = serde_json::from_str(blob)
            .map_err(|e| ConversionError::MalformedSideChannel(format!("expected a JSON array of strings: {}", e)))?;
        Ok(Self { headers })
    }

    /// Looks up `key` among container attributes.
    ///
    /// Returns `Ok(None)` when the attribute is absent. A present attribute
    /// that does not decode is an error.
    pub fn from_attributes(attributes: &BTreeMap<String, String>, key: &str) -> Result<Option<Self>> {
        attributes.get(key).map(|blob| Self::decode(blob)).transpose()
    }

    /// Pairs the headers with the accepted planes.
    ///
    /// `decoded_count` is the number of planes decoded from the container and
    /// `accepted_origins` the origin index of every accepted plane. A list as
    /// long as the decoded planes is indexed by origin; a list as long as the
    /// accepted planes is zipped positionally.
    pub fn align(&self, decoded_count: usize, accepted_origins: &[usize]) -> Result<Vec<String>> {
        if self.headers.len() == accepted_origins.len() {
            return Ok(self.headers.clone());
        }

        if self.headers.len() == decoded_count {
            return accepted_origins
                .iter()
                .map(|&origin| {
                    self.headers.get(origin).cloned().ok_or_else(|| {
                        ConversionError::MalformedSideChannel(format!("no header for plane {}", origin))
                    })
                })
                .collect();
        }

        Err(ConversionError::MalformedSideChannel(format!(
            "{} headers for {} planes",
            self.headers.len(),
            accepted_origins.len()
        )))
    }
}

pub fn encode(headers: &[String]) -> String {
    HeaderSideChannel::new(headers.to_vec()).encode()
}

pub fn decode(blob: &str) -> Result<Vec<String>> {
    HeaderSideChannel::decode(blob).map(HeaderSideChannel::into_headers)
}
