// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe sequencer core for the replay director.
//!
//! Holds the data model and editing semantics for camera sequences:
//! per-property keyframe tracks, blend-curve interpolation, selection
//! and bulk edits, undo/redo, and a JSON sequence library. Presentation
//! (timeline widgets, windows) and the replay transport live in the
//! embedding application; this crate exposes [`ReplayApi`] as the seam
//! between the two.

pub mod blend;
pub mod director;
pub mod error;
pub mod keyframe;
pub mod library;
pub mod property;
pub mod selection;
pub mod sequence;
pub mod track;

pub use blend::BlendCurve;
pub use director::{Director, ReplayApi};
pub use error::{Result, SequencerError};
pub use keyframe::{Keyframe, KeyframeId, KeyframeValue, ValueKind};
pub use library::SequenceLibrary;
pub use property::Property;
pub use selection::{DragSession, KeyframeRef, SelectionEditor};
pub use sequence::{Sequence, SequencerEvent};
pub use track::Track;
