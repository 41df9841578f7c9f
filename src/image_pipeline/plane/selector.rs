//! Picks the planes of a source container that can share one output container.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::pixel::PixelType;
use crate::image_pipeline::plane::types::PlaneCandidate;

/// Outcome of plane selection. Indices refer to the candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub accepted: Vec<usize>,
    pub dropped: Vec<usize>,
    /// (width, height) shared by every accepted plane
    pub shape: (usize, usize),
    /// The requested type, or the first candidate's native type
    pub resolved_type: PixelType,
}

/// Scans candidates in container order.
///
/// The first candidate is always accepted and fixes the reference shape. The
/// resolved type is the requested one, or the first candidate's native type.
/// Later candidates join only when their shape matches and their native type
/// equals the resolved type. Everything else is dropped without error.
pub fn select_compatible(candidates: &[PlaneCandidate], requested: Option<PixelType>) -> Result<Selection> {
    let Some(first) = candidates.first() else {
        return Err(ConversionError::NoImageData(
            "source contains no 2D image planes".to_string(),
        ));
    };

    let shape = first.shape;
    let resolved_type = requested.unwrap_or(first.native_type);
    let mut accepted = vec![0];
    let mut dropped = Vec::new();

    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        let same_shape = candidate.shape == shape;
        let same_type = candidate.native_type == resolved_type;

        if same_shape && same_type {
            accepted.push(index);
        } else {
            debug!(
                index,
                width = candidate.shape.0,
                height = candidate.shape.1,
                native_type = %candidate.native_type,
                "Dropping incompatible plane"
            );
            dropped.push(index);
        }
    }

    Ok(Selection {
        accepted,
        dropped,
        shape,
        resolved_type,
    })
}
