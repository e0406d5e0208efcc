// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-property keyframe storage and evaluation.
//!
//! A track owns the ordered keyframe list for one [`Property`] and keeps
//! it sorted non-decreasing by time across every mutation. Keyframes at
//! the exact same time are permitted; their relative order is insertion
//! order (all mutations are stable).

use crate::blend::BlendCurve;
use crate::error::SequencerError;
use crate::keyframe::{Keyframe, KeyframeId, KeyframeValue, ValueKind};
use crate::property::Property;
use std::cmp::Ordering;

/// The ordered keyframe sequence for one property.
#[derive(Debug, Clone)]
pub struct Track {
    property: Property,
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Create an empty track for a property.
    pub fn new(property: Property) -> Self {
        Self {
            property,
            keyframes: Vec::new(),
        }
    }

    /// Rebuild a track from document keyframes, restoring the sort
    /// invariant for hand-edited documents. The sort is stable, so
    /// equal-time keyframes keep their document order.
    pub(crate) fn from_keyframes(property: Property, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
        for kf in &mut keyframes {
            kf.time = kf.time.max(0.0);
        }
        Self {
            property,
            keyframes,
        }
    }

    /// The property this track animates.
    pub fn property(&self) -> Property {
        self.property
    }

    /// The value shape this track stores.
    pub fn kind(&self) -> ValueKind {
        self.property.kind()
    }

    /// All keyframes in time order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Number of keyframes.
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track has no keyframes.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Time of the first keyframe.
    pub fn first_time(&self) -> Option<f32> {
        self.keyframes.first().map(|k| k.time)
    }

    /// Time of the last keyframe.
    pub fn last_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }

    /// Get a keyframe by id.
    pub fn get(&self, id: KeyframeId) -> Option<&Keyframe> {
        self.keyframes.iter().find(|k| k.id == id)
    }

    /// Position of a keyframe within the track.
    pub fn index_of(&self, id: KeyframeId) -> Option<usize> {
        self.keyframes.iter().position(|k| k.id == id)
    }

    /// Insert a keyframe, maintaining sort order. Duplicate times are
    /// allowed; the new keyframe lands after existing equal-time ones.
    pub fn insert(&mut self, time: f32, value: KeyframeValue, blend: impl Into<String>) -> KeyframeId {
        debug_assert_eq!(value.kind(), self.kind(), "track value shapes never mix");
        let kf = Keyframe::new(time, value, blend);
        let id = kf.id;
        let at = self.keyframes.partition_point(|k| k.time <= kf.time);
        self.keyframes.insert(at, kf);
        id
    }

    /// Remove a keyframe. Idempotent: a stale id is a silent no-op.
    pub fn remove(&mut self, id: KeyframeId) {
        self.keyframes.retain(|k| k.id != id);
    }

    /// Move a keyframe to a new time, repositioning the one element to
    /// keep the track sorted. Returns false on a stale id.
    pub fn set_time(&mut self, id: KeyframeId, time: f32) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        let mut kf = self.keyframes.remove(idx);
        kf.time = time.max(0.0);
        let at = self.keyframes.partition_point(|k| k.time <= kf.time);
        self.keyframes.insert(at, kf);
        true
    }

    /// Replace a keyframe's value in place. Returns false on a stale id
    /// or a value whose shape does not match the track.
    pub fn set_value(&mut self, id: KeyframeId, value: KeyframeValue) -> bool {
        if value.kind() != self.kind() {
            return false;
        }
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.keyframes[idx].value = value;
        true
    }

    /// Replace a keyframe's blend curve name. Returns false on a stale id.
    pub fn set_blend(&mut self, id: KeyframeId, blend: impl Into<String>) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        self.keyframes[idx].blend = blend.into();
        true
    }

    /// Keyframes whose time lies within `window` of `time`, in track
    /// order. Used by snapping and adjacency selection.
    pub fn keyframes_near(&self, time: f32, window: f32) -> Vec<KeyframeId> {
        self.keyframes
            .iter()
            .filter(|k| (k.time - time).abs() <= window)
            .map(|k| k.id)
            .collect()
    }

    /// Keyframes that sit closer than `window` to a neighbor, in track
    /// order. The presentation layer highlights these as overlapping.
    pub fn overlapping(&self, window: f32) -> Vec<KeyframeId> {
        let mut flagged = vec![false; self.keyframes.len()];
        for i in 1..self.keyframes.len() {
            if self.keyframes[i].time - self.keyframes[i - 1].time < window {
                flagged[i - 1] = true;
                flagged[i] = true;
            }
        }
        self.keyframes
            .iter()
            .zip(flagged)
            .filter_map(|(k, f)| f.then_some(k.id))
            .collect()
    }

    /// Deep-copy a keyframe at the same time with a fresh id. The caller
    /// typically moves the copy afterwards (duplicate-and-drag).
    pub fn duplicate(&mut self, id: KeyframeId) -> Option<KeyframeId> {
        let source = self.get(id)?.clone();
        Some(self.insert(source.time, source.value, source.blend))
    }

    /// Remove every keyframe.
    pub fn clear(&mut self) {
        self.keyframes.clear();
    }

    /// Evaluate the track value at a query time.
    ///
    /// Clamps to the first/last keyframe value outside the keyframed
    /// span. In between, locates the bracketing pair `(a, b)` with
    /// `a.time <= time < b.time`, eases the normalized fraction through
    /// `b`'s blend curve, and blends the two values. An unknown blend
    /// curve name logs a warning and falls back to linear.
    pub fn evaluate(&self, time: f32) -> Result<KeyframeValue, SequencerError> {
        let first = self.keyframes.first().ok_or(SequencerError::NoKeyframes)?;
        if time <= first.time {
            return Ok(first.value.clone());
        }
        let last = &self.keyframes[self.keyframes.len() - 1];
        if time >= last.time {
            return Ok(last.value.clone());
        }

        // First keyframe strictly after the query time. Both bounds are
        // in range: the clamps above rule out the ends.
        let next = self.keyframes.partition_point(|k| k.time <= time);
        let a = &self.keyframes[next - 1];
        let b = &self.keyframes[next];

        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return Ok(b.value.clone());
        }
        let fraction = (time - a.time) / span;
        let curve = BlendCurve::from_name(&b.blend).unwrap_or_else(|| {
            tracing::warn!(curve = %b.blend, property = self.property.name(),
                "unknown blend curve, falling back to linear");
            BlendCurve::Linear
        });
        let eased = curve.apply(fraction);
        a.value
            .blend_with(&b.value, eased)
            .ok_or(SequencerError::ShapeMismatch {
                property: self.property,
                kind: b.value.kind(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_track(points: &[(f32, f32)]) -> Track {
        let mut track = Track::new(Property::FieldOfView);
        for &(time, value) in points {
            track.insert(time, KeyframeValue::Float(value), "linear");
        }
        track
    }

    fn assert_sorted(track: &Track) {
        let times: Vec<f32> = track.keyframes().iter().map(|k| k.time).collect();
        for pair in times.windows(2) {
            assert!(pair[0] <= pair[1], "track out of order: {times:?}");
        }
    }

    #[test]
    fn test_insert_keeps_sorted() {
        let track = float_track(&[(5.0, 1.0), (1.0, 2.0), (3.0, 3.0), (1.0, 4.0)]);
        assert_sorted(&track);
        assert_eq!(track.len(), 4);
        // Equal times keep insertion order.
        assert_eq!(track.keyframes()[0].value, KeyframeValue::Float(2.0));
        assert_eq!(track.keyframes()[1].value, KeyframeValue::Float(4.0));
    }

    #[test]
    fn test_set_time_repositions() {
        let mut track = float_track(&[(0.0, 1.0), (5.0, 2.0), (10.0, 3.0)]);
        let id = track.keyframes()[0].id;
        assert!(track.set_time(id, 7.5));
        assert_sorted(&track);
        assert_eq!(track.keyframes()[1].id, id);
        // Negative times clamp to zero.
        assert!(track.set_time(id, -4.0));
        assert_eq!(track.keyframes()[0].time, 0.0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut track = float_track(&[(0.0, 1.0), (1.0, 2.0)]);
        let id = track.keyframes()[0].id;
        track.remove(id);
        assert_eq!(track.len(), 1);
        track.remove(id);
        assert_eq!(track.len(), 1);
    }

    #[test]
    fn test_stale_id_mutations_fail_quietly() {
        let mut track = float_track(&[(0.0, 1.0)]);
        let stale = KeyframeId::new();
        assert!(!track.set_time(stale, 3.0));
        assert!(!track.set_value(stale, KeyframeValue::Float(9.0)));
        assert!(!track.set_blend(stale, "snap"));
        assert_eq!(track.duplicate(stale), None);
    }

    #[test]
    fn test_set_value_rejects_wrong_shape() {
        let mut track = float_track(&[(0.0, 1.0)]);
        let id = track.keyframes()[0].id;
        assert!(!track.set_value(id, KeyframeValue::Bool(true)));
        assert!(track.set_value(id, KeyframeValue::Float(2.0)));
    }

    #[test]
    fn test_duplicate_copies_in_place() {
        let mut track = float_track(&[(2.0, 1.0)]);
        let id = track.keyframes()[0].id;
        let copy = track.duplicate(id).unwrap();
        assert_ne!(copy, id);
        assert_eq!(track.len(), 2);
        assert_eq!(track.keyframes()[0].time, track.keyframes()[1].time);
        assert_eq!(track.keyframes()[0].value, track.keyframes()[1].value);
        assert_sorted(&track);
    }

    #[test]
    fn test_evaluate_empty_track() {
        let track = Track::new(Property::FieldOfView);
        assert!(matches!(
            track.evaluate(1.0),
            Err(SequencerError::NoKeyframes)
        ));
    }

    #[test]
    fn test_evaluate_clamps_at_ends() {
        let track = float_track(&[(2.0, 10.0), (8.0, 20.0)]);
        assert_eq!(track.evaluate(0.0).unwrap(), KeyframeValue::Float(10.0));
        assert_eq!(track.evaluate(2.0).unwrap(), KeyframeValue::Float(10.0));
        assert_eq!(track.evaluate(8.0).unwrap(), KeyframeValue::Float(20.0));
        assert_eq!(track.evaluate(99.0).unwrap(), KeyframeValue::Float(20.0));
    }

    #[test]
    fn test_evaluate_linear_midpoint() {
        let track = float_track(&[(0.0, 0.0), (10.0, 100.0)]);
        assert_eq!(track.evaluate(5.0).unwrap(), KeyframeValue::Float(50.0));
    }

    #[test]
    fn test_evaluate_bool_step() {
        let mut track = Track::new(Property::DepthFogEnabled);
        track.insert(0.0, KeyframeValue::Bool(false), "linear");
        track.insert(10.0, KeyframeValue::Bool(true), "linear");
        assert_eq!(track.evaluate(5.0).unwrap(), KeyframeValue::Bool(false));
        assert_eq!(track.evaluate(9.99).unwrap(), KeyframeValue::Bool(false));
        assert_eq!(track.evaluate(10.0).unwrap(), KeyframeValue::Bool(true));
    }

    #[test]
    fn test_evaluate_uses_incoming_blend() {
        let mut track = Track::new(Property::FieldOfView);
        track.insert(0.0, KeyframeValue::Float(0.0), "linear");
        track.insert(10.0, KeyframeValue::Float(100.0), "snap");
        // The snap curve on the second keyframe holds the first value.
        assert_eq!(track.evaluate(9.0).unwrap(), KeyframeValue::Float(0.0));
        assert_eq!(track.evaluate(10.0).unwrap(), KeyframeValue::Float(100.0));
    }

    #[test]
    fn test_evaluate_unknown_blend_falls_back_to_linear() {
        let mut track = Track::new(Property::FieldOfView);
        track.insert(0.0, KeyframeValue::Float(0.0), "linear");
        track.insert(10.0, KeyframeValue::Float(100.0), "wobble");
        assert_eq!(track.evaluate(5.0).unwrap(), KeyframeValue::Float(50.0));
    }

    #[test]
    fn test_evaluate_equal_time_bracket() {
        let track = float_track(&[(0.0, 1.0), (5.0, 2.0), (5.0, 3.0), (10.0, 4.0)]);
        // Exactly at the duplicated time the later keyframe wins.
        assert_eq!(track.evaluate(5.0).unwrap(), KeyframeValue::Float(3.0));
    }

    #[test]
    fn test_keyframes_near_window() {
        let track = float_track(&[(0.0, 1.0), (4.9, 2.0), (5.0, 3.0), (5.1, 4.0), (9.0, 5.0)]);
        let near = track.keyframes_near(5.0, 0.1);
        assert_eq!(near.len(), 3);
    }

    #[test]
    fn test_overlapping_pairs() {
        let track = float_track(&[(0.0, 1.0), (1.0, 2.0), (1.05, 3.0), (5.0, 4.0)]);
        let overlap = track.overlapping(0.1);
        assert_eq!(overlap.len(), 2);
        assert_eq!(overlap[0], track.keyframes()[1].id);
        assert_eq!(overlap[1], track.keyframes()[2].id);
    }

    #[test]
    fn test_from_keyframes_restores_order() {
        let keyframes = vec![
            Keyframe::new(5.0, KeyframeValue::Float(1.0), "linear"),
            Keyframe::new(1.0, KeyframeValue::Float(2.0), "linear"),
        ];
        let track = Track::from_keyframes(Property::FieldOfView, keyframes);
        assert_sorted(&track);
        assert_eq!(track.first_time(), Some(1.0));
    }
}
