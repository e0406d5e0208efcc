// SPDX-License-Identifier: MIT OR Apache-2.0
//! A named collection of tracks with undo/redo history.
//!
//! The sequence is the mutation surface for the presentation layer:
//! every edit goes through it so the undo contract holds. Each mutating
//! call pushes a pre-mutation snapshot and clears the redo stack, except
//! inside an edit group, where the whole group coalesces into one
//! snapshot (continuous pointer drags, bulk selection edits).

use crate::error::SequencerError;
use crate::keyframe::{KeyframeId, KeyframeValue};
use crate::property::Property;
use crate::track::Track;
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Maximum undo history depth; oldest snapshots are evicted.
const MAX_HISTORY: usize = 100;

/// Change notification produced by a mutation, drained by the
/// presentation layer after each call.
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    /// A track's keyframes changed (insert/remove/move/edit).
    KeyframesChanged(Property),
    /// The set of selected keyframes changed.
    SelectionChanged,
    /// A sequence was loaded or created, replacing in-memory state.
    SequenceLoaded(String),
}

/// Full-sequence snapshot history.
#[derive(Debug, Clone, Default)]
struct History {
    undo: VecDeque<IndexMap<Property, Track>>,
    redo: Vec<IndexMap<Property, Track>>,
}

/// A named, persistable collection of tracks.
#[derive(Debug, Clone)]
pub struct Sequence {
    name: String,
    tracks: IndexMap<Property, Track>,
    dirty: bool,
    history: History,
    group_depth: u32,
    group_snapshotted: bool,
    events: Vec<SequencerEvent>,
}

impl Sequence {
    /// Create a new empty sequence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: IndexMap::new(),
            dirty: false,
            history: History::default(),
            group_depth: 0,
            group_snapshotted: false,
            events: Vec::new(),
        }
    }

    /// Rebuild a sequence from loaded tracks with fresh history and a
    /// clean dirty flag, queueing the loaded notification.
    pub(crate) fn from_parts(name: &str, tracks: IndexMap<Property, Track>) -> Self {
        let mut sequence = Self::new(name);
        sequence.tracks = tracks;
        sequence.events.push(SequencerEvent::SequenceLoaded(name.to_owned()));
        sequence
    }

    /// The sequence name, which keys its persisted document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether there are unsaved edits.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Get a track.
    pub fn track(&self, property: Property) -> Option<&Track> {
        self.tracks.get(&property)
    }

    /// All tracks in insertion order.
    pub fn tracks(&self) -> impl Iterator<Item = (Property, &Track)> {
        self.tracks.iter().map(|(p, t)| (*p, t))
    }

    /// Number of tracks, including emptied ones.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Start/end time over all keyframes. An empty sequence spans 0..0.
    pub fn bounds(&self) -> (f32, f32) {
        let mut bounds: Option<(f32, f32)> = None;
        for track in self.tracks.values() {
            if let (Some(first), Some(last)) = (track.first_time(), track.last_time()) {
                bounds = Some(match bounds {
                    Some((start, end)) => (start.min(first), end.max(last)),
                    None => (first, last),
                });
            }
        }
        bounds.unwrap_or((0.0, 0.0))
    }

    /// Evaluate every non-empty track at one query time. Empty tracks
    /// are omitted so their properties stay unmodified downstream.
    pub fn evaluate_all(&self, time: f32) -> IndexMap<Property, KeyframeValue> {
        let mut values = IndexMap::new();
        for (property, track) in &self.tracks {
            match track.evaluate(time) {
                Ok(value) => {
                    values.insert(*property, value);
                }
                Err(SequencerError::NoKeyframes) => {}
                Err(err) => {
                    tracing::warn!(property = property.name(), %err, "track evaluation failed");
                }
            }
        }
        values
    }

    /// Insert a keyframe, auto-creating the track. The value shape must
    /// match the property; mismatches fail before any state changes.
    pub fn add_keyframe(
        &mut self,
        property: Property,
        time: f32,
        value: KeyframeValue,
        blend: impl Into<String>,
    ) -> Result<KeyframeId, SequencerError> {
        if value.kind() != property.kind() {
            return Err(SequencerError::ShapeMismatch {
                property,
                kind: value.kind(),
            });
        }
        self.push_undo();
        let id = self
            .tracks
            .entry(property)
            .or_insert_with(|| Track::new(property))
            .insert(time, value, blend);
        self.touch(property);
        Ok(id)
    }

    /// Remove a keyframe. A stale reference is a no-op that leaves the
    /// history untouched; returns whether anything was removed.
    pub fn remove_keyframe(&mut self, property: Property, id: KeyframeId) -> bool {
        if !self.contains(property, id) {
            return false;
        }
        self.push_undo();
        if let Some(track) = self.tracks.get_mut(&property) {
            track.remove(id);
        }
        self.touch(property);
        true
    }

    /// Move a keyframe to a new time (clamped at zero).
    pub fn set_keyframe_time(&mut self, property: Property, id: KeyframeId, time: f32) -> bool {
        if !self.contains(property, id) {
            return false;
        }
        self.push_undo();
        let moved = self
            .tracks
            .get_mut(&property)
            .is_some_and(|track| track.set_time(id, time));
        if moved {
            self.touch(property);
        }
        moved
    }

    /// Replace a keyframe's value. The shape must match the property.
    pub fn set_keyframe_value(
        &mut self,
        property: Property,
        id: KeyframeId,
        value: KeyframeValue,
    ) -> bool {
        if value.kind() != property.kind() || !self.contains(property, id) {
            return false;
        }
        self.push_undo();
        let changed = self
            .tracks
            .get_mut(&property)
            .is_some_and(|track| track.set_value(id, value));
        if changed {
            self.touch(property);
        }
        changed
    }

    /// Replace a keyframe's blend curve name.
    pub fn set_keyframe_blend(
        &mut self,
        property: Property,
        id: KeyframeId,
        blend: impl Into<String>,
    ) -> bool {
        if !self.contains(property, id) {
            return false;
        }
        self.push_undo();
        let changed = self
            .tracks
            .get_mut(&property)
            .is_some_and(|track| track.set_blend(id, blend));
        if changed {
            self.touch(property);
        }
        changed
    }

    /// Duplicate a keyframe in place, returning the copy's id.
    pub fn duplicate_keyframe(&mut self, property: Property, id: KeyframeId) -> Option<KeyframeId> {
        if !self.contains(property, id) {
            return None;
        }
        self.push_undo();
        let copy = self
            .tracks
            .get_mut(&property)
            .and_then(|track| track.duplicate(id));
        if copy.is_some() {
            self.touch(property);
        }
        copy
    }

    /// Remove every keyframe from every track in one undo step.
    pub fn clear_keyframes(&mut self) {
        let populated: Vec<Property> = self
            .tracks
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(p, _)| *p)
            .collect();
        if populated.is_empty() {
            return;
        }
        self.push_undo();
        for property in populated {
            if let Some(track) = self.tracks.get_mut(&property) {
                track.clear();
            }
            self.touch(property);
        }
    }

    /// Open an edit group: until the matching [`Self::end_edit_group`],
    /// the first mutation snapshots once and later mutations coalesce
    /// into the same undo step. Groups nest; only the outermost pair
    /// delimits the step. The caller brackets pointer drags with this
    /// (pointer-down to pointer-up).
    pub fn begin_edit_group(&mut self) {
        self.group_depth += 1;
    }

    /// Close an edit group opened by [`Self::begin_edit_group`].
    pub fn end_edit_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.group_snapshotted = false;
        }
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.history.undo.is_empty()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.history.redo.is_empty()
    }

    /// Restore the most recent snapshot, moving the current state onto
    /// the redo stack. Returns false when the history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.tracks, previous);
        self.notify_restored(&current);
        self.history.redo.push(current);
        self.dirty = true;
        true
    }

    /// Mirror of [`Self::undo`].
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.tracks, next);
        self.notify_restored(&current);
        self.history.undo.push_back(current);
        self.dirty = true;
        true
    }

    /// Drain pending change notifications.
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn queue_event(&mut self, event: SequencerEvent) {
        self.events.push(event);
    }

    fn contains(&self, property: Property, id: KeyframeId) -> bool {
        self.tracks
            .get(&property)
            .is_some_and(|track| track.get(id).is_some())
    }

    fn touch(&mut self, property: Property) {
        self.dirty = true;
        self.events.push(SequencerEvent::KeyframesChanged(property));
    }

    fn push_undo(&mut self) {
        if self.group_depth > 0 {
            if self.group_snapshotted {
                return;
            }
            self.group_snapshotted = true;
        }
        self.history.redo.clear();
        self.history.undo.push_back(self.tracks.clone());
        while self.history.undo.len() > MAX_HISTORY {
            self.history.undo.pop_front();
        }
    }

    fn notify_restored(&mut self, replaced: &IndexMap<Property, Track>) {
        for property in replaced.keys() {
            self.events.push(SequencerEvent::KeyframesChanged(*property));
        }
        for property in self.tracks.keys() {
            if !replaced.contains_key(property) {
                self.events.push(SequencerEvent::KeyframesChanged(*property));
            }
        }
    }
}
