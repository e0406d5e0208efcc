// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback-driven application of sequenced values to the replay.

use crate::keyframe::KeyframeValue;
use crate::property::Property;
use crate::sequence::Sequence;

/// Connection to the running replay.
///
/// The sequencer core stays transport-agnostic; the embedding
/// application implements this over whatever replay API it talks to.
pub trait ReplayApi {
    /// Current playback time in seconds.
    fn current_playback_time(&self) -> f32;

    /// Whether the replay is currently playing.
    fn is_playing(&self) -> bool;

    /// Apply one sequenced property value to the replay.
    fn apply_property_value(&mut self, property: Property, value: &KeyframeValue);
}

/// Drives sequenced values into the replay each tick.
#[derive(Debug, Default)]
pub struct Director {
    sequencing: bool,
}

impl Director {
    /// Create a director with sequencing off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether sequencing is applying values to the replay.
    pub fn sequencing(&self) -> bool {
        self.sequencing
    }

    /// Turn sequencing on or off. While off, [`Self::tick`] leaves the
    /// replay untouched so the user keeps manual camera control.
    pub fn set_sequencing(&mut self, enabled: bool) {
        if self.sequencing != enabled {
            self.sequencing = enabled;
            tracing::debug!(enabled, "sequencing toggled");
        }
    }

    /// Evaluate the sequence at the replay's playback time and forward
    /// every keyframed property. Tracks without keyframes are skipped so
    /// their properties keep whatever the replay last had.
    pub fn tick(&self, sequence: &Sequence, api: &mut dyn ReplayApi) {
        if !self.sequencing {
            return;
        }
        let time = api.current_playback_time();
        for (property, value) in sequence.evaluate_all(time) {
            api.apply_property_value(property, &value);
        }
    }
}
