// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe selection and bulk editing.
//!
//! The selection is transient: it lives for the editing session, is
//! never persisted, and loading a sequence invalidates it (keyframe ids
//! regenerate on load). Every bulk edit is one coalesced undo step, and
//! edits that do not apply to a keyframe's value shape skip that
//! keyframe silently.

use crate::blend::BlendCurve;
use crate::error::SequencerError;
use crate::keyframe::{KeyframeId, KeyframeValue};
use crate::property::Property;
use crate::sequence::{Sequence, SequencerEvent};
use std::collections::HashSet;

/// Reference to one keyframe within a sequence.
pub type KeyframeRef = (Property, KeyframeId);

/// Clipboard entry holding everything needed to recreate a keyframe.
#[derive(Debug, Clone)]
struct ClipboardEntry {
    property: Property,
    time: f32,
    value: KeyframeValue,
    blend: String,
}

/// The set of currently selected keyframes across tracks, plus the
/// bulk-edit operations that act on it.
#[derive(Debug, Default)]
pub struct SelectionEditor {
    selected: HashSet<KeyframeRef>,
    clipboard: Vec<ClipboardEntry>,
    events: Vec<SequencerEvent>,
}

impl SelectionEditor {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection.
    pub fn select(&mut self, refs: impl IntoIterator<Item = KeyframeRef>) {
        self.selected = refs.into_iter().collect();
        self.events.push(SequencerEvent::SelectionChanged);
    }

    /// Toggle one keyframe in or out of the selection.
    pub fn toggle(&mut self, key: KeyframeRef) {
        if !self.selected.remove(&key) {
            self.selected.insert(key);
        }
        self.events.push(SequencerEvent::SelectionChanged);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.events.push(SequencerEvent::SelectionChanged);
        }
    }

    /// Select every keyframe in every track.
    pub fn select_all(&mut self, sequence: &Sequence) {
        let all: Vec<KeyframeRef> = sequence
            .tracks()
            .flat_map(|(property, track)| {
                track.keyframes().iter().map(move |k| (property, k.id))
            })
            .collect();
        self.select(all);
    }

    /// Number of selected keyframes.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether a keyframe is selected.
    pub fn is_selected(&self, key: KeyframeRef) -> bool {
        self.selected.contains(&key)
    }

    /// The selected keyframe references, in no particular order.
    pub fn selected(&self) -> impl Iterator<Item = KeyframeRef> + '_ {
        self.selected.iter().copied()
    }

    /// Drop references to keyframes that no longer exist.
    pub fn retain_valid(&mut self, sequence: &Sequence) {
        let before = self.selected.len();
        self.selected.retain(|&(property, id)| {
            sequence
                .track(property)
                .is_some_and(|track| track.get(id).is_some())
        });
        if self.selected.len() != before {
            self.events.push(SequencerEvent::SelectionChanged);
        }
    }

    /// Drain pending selection notifications.
    pub fn take_events(&mut self) -> Vec<SequencerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add every keyframe, in any track, whose time lies within `window`
    /// of some already-selected keyframe's time. One expansion pass over
    /// the selection as it was when the call started.
    pub fn select_adjacent(&mut self, sequence: &Sequence, window: f32) {
        let anchor_times: Vec<f32> = self
            .selected
            .iter()
            .filter_map(|&(property, id)| {
                sequence
                    .track(property)
                    .and_then(|track| track.get(id))
                    .map(|k| k.time)
            })
            .collect();
        if anchor_times.is_empty() {
            return;
        }
        let mut grew = false;
        for (property, track) in sequence.tracks() {
            for keyframe in track.keyframes() {
                if anchor_times.iter().any(|t| (keyframe.time - t).abs() <= window)
                    && self.selected.insert((property, keyframe.id))
                {
                    grew = true;
                }
            }
        }
        if grew {
            self.events.push(SequencerEvent::SelectionChanged);
        }
    }

    /// Per selected track, move the selection to the next keyframe by
    /// time. A track with several selected keyframes collapses to one.
    /// Equal-time keyframes are stepped over in store order; at the end
    /// of the track the anchor stays put.
    pub fn select_next(&mut self, sequence: &Sequence) {
        self.step_selection(sequence, true);
    }

    /// Mirror of [`Self::select_next`], moving backwards.
    pub fn select_prev(&mut self, sequence: &Sequence) {
        self.step_selection(sequence, false);
    }

    fn step_selection(&mut self, sequence: &Sequence, forward: bool) {
        // Anchor per track: the latest selected keyframe when stepping
        // forward, the earliest when stepping back.
        let mut anchors: Vec<(Property, usize)> = Vec::new();
        for &(property, id) in &self.selected {
            let Some(track) = sequence.track(property) else {
                continue;
            };
            let Some(index) = track.index_of(id) else {
                continue;
            };
            match anchors.iter_mut().find(|(p, _)| *p == property) {
                Some((_, existing)) => {
                    if (forward && index > *existing) || (!forward && index < *existing) {
                        *existing = index;
                    }
                }
                None => anchors.push((property, index)),
            }
        }
        if anchors.is_empty() {
            return;
        }

        let mut next_selection: Vec<KeyframeRef> = Vec::with_capacity(anchors.len());
        for (property, anchor) in anchors {
            let Some(track) = sequence.track(property) else {
                continue;
            };
            let keyframes = track.keyframes();
            let anchor_time = keyframes[anchor].time;
            let stepped = if forward {
                keyframes[anchor + 1..]
                    .iter()
                    .find(|k| k.time > anchor_time)
            } else {
                keyframes[..anchor].iter().rev().find(|k| k.time < anchor_time)
            };
            let chosen = stepped.unwrap_or(&keyframes[anchor]);
            next_selection.push((property, chosen.id));
        }
        self.select(next_selection);
    }

    /// Mean time of the selection, for seeking playback to it.
    pub fn seek_time(&self, sequence: &Sequence) -> Option<f32> {
        let times: Vec<f32> = self
            .selected
            .iter()
            .filter_map(|&(property, id)| {
                sequence
                    .track(property)
                    .and_then(|track| track.get(id))
                    .map(|k| k.time)
            })
            .collect();
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<f32>() / times.len() as f32)
    }

    /// Shift every selected keyframe's time by `delta`, clamped at zero.
    pub fn apply_time_shift(&self, sequence: &mut Sequence, delta: f32) {
        sequence.begin_edit_group();
        for &(property, id) in &self.selected {
            let Some(time) = sequence
                .track(property)
                .and_then(|track| track.get(id))
                .map(|k| k.time)
            else {
                continue;
            };
            sequence.set_keyframe_time(property, id, time + delta);
        }
        sequence.end_edit_group();
    }

    /// Set every selected keyframe's value. Keyframes whose track shape
    /// differs from the value are skipped.
    pub fn apply_value_set(&self, sequence: &mut Sequence, value: &KeyframeValue) {
        sequence.begin_edit_group();
        for &(property, id) in &self.selected {
            if property.kind() != value.kind() {
                continue;
            }
            sequence.set_keyframe_value(property, id, value.clone());
        }
        sequence.end_edit_group();
    }

    /// Add `delta` to every selected keyframe's value. Only float and
    /// vector shapes support deltas; other keyframes are skipped.
    pub fn apply_value_delta(&self, sequence: &mut Sequence, delta: &KeyframeValue) {
        sequence.begin_edit_group();
        for &(property, id) in &self.selected {
            let Some(current) = sequence
                .track(property)
                .and_then(|track| track.get(id))
                .map(|k| k.value.clone())
            else {
                continue;
            };
            let shifted = match (&current, delta) {
                (KeyframeValue::Float(a), KeyframeValue::Float(d)) => {
                    Some(KeyframeValue::Float(a + d))
                }
                (
                    KeyframeValue::Vec3 { x, y, z },
                    KeyframeValue::Vec3 {
                        x: dx,
                        y: dy,
                        z: dz,
                    },
                ) => Some(KeyframeValue::vec3(x + dx, y + dy, z + dz)),
                _ => None,
            };
            if let Some(value) = shifted {
                sequence.set_keyframe_value(property, id, value);
            }
        }
        sequence.end_edit_group();
    }

    /// Set every selected keyframe's blend curve. The name must be a
    /// known curve; interactive edits never write unknown names.
    pub fn apply_blend(&self, sequence: &mut Sequence, curve: &str) -> Result<(), SequencerError> {
        if BlendCurve::from_name(curve).is_none() {
            return Err(SequencerError::UnknownBlendCurve(curve.to_owned()));
        }
        sequence.begin_edit_group();
        for &(property, id) in &self.selected {
            sequence.set_keyframe_blend(property, id, curve);
        }
        sequence.end_edit_group();
        Ok(())
    }

    /// Duplicate every selected keyframe in place and select the copies,
    /// so a following drag moves only the new keyframes.
    pub fn duplicate_selected(&mut self, sequence: &mut Sequence) {
        sequence.begin_edit_group();
        let mut copies: Vec<KeyframeRef> = Vec::with_capacity(self.selected.len());
        for &(property, id) in &self.selected {
            if let Some(copy) = sequence.duplicate_keyframe(property, id) {
                copies.push((property, copy));
            }
        }
        sequence.end_edit_group();
        if !copies.is_empty() {
            self.select(copies);
        }
    }

    /// Delete every selected keyframe in one undo step and clear the
    /// selection.
    pub fn delete_selected(&mut self, sequence: &mut Sequence) {
        sequence.begin_edit_group();
        for &(property, id) in &self.selected {
            sequence.remove_keyframe(property, id);
        }
        sequence.end_edit_group();
        self.clear();
    }

    /// Copy the selected keyframes to the internal clipboard.
    pub fn copy_keyframes(&mut self, sequence: &Sequence) {
        self.clipboard = self
            .selected
            .iter()
            .filter_map(|&(property, id)| {
                sequence
                    .track(property)
                    .and_then(|track| track.get(id))
                    .map(|k| ClipboardEntry {
                        property,
                        time: k.time,
                        value: k.value.clone(),
                        blend: k.blend.clone(),
                    })
            })
            .collect();
    }

    /// Paste clipboard keyframes back into their tracks at their copied
    /// times and select the new copies. One undo step.
    pub fn paste_keyframes(&mut self, sequence: &mut Sequence) {
        if self.clipboard.is_empty() {
            return;
        }
        sequence.begin_edit_group();
        let mut pasted: Vec<KeyframeRef> = Vec::with_capacity(self.clipboard.len());
        for entry in &self.clipboard {
            match sequence.add_keyframe(
                entry.property,
                entry.time,
                entry.value.clone(),
                entry.blend.clone(),
            ) {
                Ok(id) => pasted.push((entry.property, id)),
                Err(err) => {
                    tracing::warn!(property = entry.property.name(), %err, "paste skipped a keyframe");
                }
            }
        }
        sequence.end_edit_group();
        if !pasted.is_empty() {
            self.select(pasted);
        }
    }
}

/// State for one continuous pointer drag over the selection.
///
/// Idle until [`Self::begin`]; dragging until [`Self::end`]. The whole
/// drag coalesces into a single undo step. When the duplicate modifier
/// is first observed mid-drag, the session forks copies that follow the
/// pointer while the original keyframes return to their pre-drag times.
#[derive(Debug, Default)]
pub struct DragSession {
    refs: Vec<(Property, KeyframeId, f32)>,
    active: bool,
    duplicated: bool,
}

impl DragSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start dragging the current selection, recording pre-drag times.
    /// Call on pointer-down over a selected keyframe.
    pub fn begin(&mut self, sequence: &mut Sequence, selection: &SelectionEditor) {
        self.refs = selection
            .selected()
            .filter_map(|(property, id)| {
                sequence
                    .track(property)
                    .and_then(|track| track.get(id))
                    .map(|k| (property, id, k.time))
            })
            .collect();
        self.active = true;
        self.duplicated = false;
        sequence.begin_edit_group();
    }

    /// Apply pointer motion: every dragged keyframe moves to its
    /// pre-drag time plus `delta` (clamped at zero). `duplicating`
    /// reflects the duplicate modifier; the first update that sees it
    /// forks the selection.
    pub fn update(
        &mut self,
        sequence: &mut Sequence,
        selection: &mut SelectionEditor,
        delta: f32,
        duplicating: bool,
    ) {
        if !self.active {
            return;
        }
        if duplicating && !self.duplicated {
            self.fork(sequence, selection);
        }
        for &(property, id, start) in &self.refs {
            sequence.set_keyframe_time(property, id, start + delta);
        }
    }

    /// Finish the drag on pointer-up, closing the undo step.
    pub fn end(&mut self, sequence: &mut Sequence) {
        if self.active {
            sequence.end_edit_group();
        }
        self.active = false;
        self.duplicated = false;
        self.refs.clear();
    }

    /// Nearest unselected keyframe time in another track within
    /// `window` of `time`, for the presentation layer's snapping.
    pub fn snap_target(
        sequence: &Sequence,
        selection: &SelectionEditor,
        dragging: KeyframeRef,
        time: f32,
        window: f32,
    ) -> Option<f32> {
        let mut best: Option<f32> = None;
        for (property, track) in sequence.tracks() {
            if property == dragging.0 {
                continue;
            }
            for id in track.keyframes_near(time, window) {
                if selection.is_selected((property, id)) {
                    continue;
                }
                if let Some(keyframe) = track.get(id) {
                    let distance = (keyframe.time - time).abs();
                    if best.map_or(true, |b| (b - time).abs() > distance) {
                        best = Some(keyframe.time);
                    }
                }
            }
        }
        best
    }

    fn fork(&mut self, sequence: &mut Sequence, selection: &mut SelectionEditor) {
        let mut forked = Vec::with_capacity(self.refs.len());
        for &(property, id, start) in &self.refs {
            let Some(copy) = sequence.duplicate_keyframe(property, id) else {
                continue;
            };
            // The original stays fixed at its pre-drag time; the copy
            // follows the pointer from here on.
            sequence.set_keyframe_time(property, id, start);
            forked.push((property, copy, start));
        }
        selection.select(forked.iter().map(|&(property, id, _)| (property, id)));
        self.refs = forked;
        self.duplicated = true;
    }
}
