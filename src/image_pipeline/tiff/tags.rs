//! ASCII tags carried through the `tiff_headers` blob.
//!
//! The blob is a JSON object mapping the decimal tag number to its string
//! value, e.g. `{"270":"flat field","305":"acquire 2.1"}`.

use serde_json::{Map, Value};
use tiff::tags::Tag;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};

pub const ASCII_TAGS: [(Tag, u16); 8] = [
    (Tag::ImageDescription, 270),
    (Tag::Make, 271),
    (Tag::Model, 272),
    (Tag::Software, 305),
    (Tag::DateTime, 306),
    (Tag::Artist, 315),
    (Tag::HostComputer, 316),
    (Tag::Copyright, 33432),
];

fn known_tag(code: u16) -> Option<Tag> {
    ASCII_TAGS
        .iter()
        .find(|(_, known)| *known == code)
        .map(|(tag, _)| *tag)
}

pub fn encode_tags(tags: &[(u16, String)]) -> String {
    let object: Map<String, Value> = tags
        .iter()
        .map(|(code, value)| (code.to_string(), Value::String(value.clone())))
        .collect();
    Value::Object(object).to_string()
}

/// Known ASCII tags in the blob, in tag-number order. Unknown keys and
/// non-string values are ignored.
pub fn decode_tags(blob: &str) -> Result<Vec<(Tag, String)>> {
    let value: Value = serde_json::from_str(blob)
        .map_err(|e| ConversionError::MalformedSideChannel(format!("TIFF tag blob: {}", e)))?;

    let Value::Object(object) = value else {
        return Err(ConversionError::MalformedSideChannel(
            "TIFF tag blob is not a JSON object".to_string(),
        ));
    };

    let mut tags = Vec::new();
    for (key, value) in object {
        let known = key
            .parse::<u16>()
            .ok()
            .and_then(|code| known_tag(code).map(|tag| (code, tag)));
        let Some((code, tag)) = known else {
            debug!("Ignoring unknown TIFF tag key {}", key);
            continue;
        };
        match value {
            Value::String(text) => tags.push((code, tag, text)),
            other => debug!("Ignoring non-string value for TIFF tag {}: {}", key, other),
        }
    }

    tags.sort_by_key(|(code, _, _)| *code);
    Ok(tags.into_iter().map(|(_, tag, text)| (tag, text)).collect())
}
