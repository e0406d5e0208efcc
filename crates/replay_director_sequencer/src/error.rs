// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error taxonomy for the sequencer core.

use crate::keyframe::ValueKind;
use crate::property::Property;
use thiserror::Error;

/// Errors produced by sequencer operations.
///
/// Most mutation paths report stale references by returning `false`
/// instead of an error; the variants here cover evaluation failures
/// and persistence.
#[derive(Debug, Error)]
pub enum SequencerError {
    /// Evaluated a track with no keyframes. Non-fatal, the caller
    /// skips applying that property.
    #[error("track has no keyframes")]
    NoKeyframes,

    /// A blend curve name did not match any known easing curve.
    #[error("unknown blend curve `{0}`")]
    UnknownBlendCurve(String),

    /// Operation addressed a stale or removed keyframe reference.
    #[error("stale or unknown keyframe reference")]
    InvalidReference,

    /// A value's shape did not match the track's property.
    #[error("value shape {kind} does not match property `{property}`")]
    ShapeMismatch {
        /// Property whose track was addressed.
        property: Property,
        /// Shape of the rejected value.
        kind: ValueKind,
    },

    /// No sequence document with the given name exists in the library.
    #[error("no sequence named `{0}`")]
    SequenceNotFound(String),

    /// Sequence storage I/O failed.
    #[error("sequence storage error: {0}")]
    Persistence(#[from] std::io::Error),

    /// A sequence document could not be parsed or written.
    #[error("sequence document error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for sequencer operations.
pub type Result<T> = std::result::Result<T, SequencerError>;
