// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persistence for sequences: a directory of JSON documents, one per
//! sequence, keyed by sequence name.
//!
//! Documents carry only what replays need (`name` plus per-property
//! keyframe lists); session-local state like keyframe ids, selection and
//! undo history is never written. Saves are atomic: the document is
//! written to a temporary file and renamed over the target.

use crate::error::SequencerError;
use crate::keyframe::Keyframe;
use crate::property::Property;
use crate::sequence::Sequence;
use crate::track::Track;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// On-disk document form of a sequence.
///
/// Track keys are raw property names so documents written by builds with
/// a different property set still parse; unknown tracks are skipped with
/// a warning on load.
#[derive(Debug, Serialize, Deserialize)]
struct SequenceDoc {
    name: String,
    #[serde(default)]
    tracks: IndexMap<String, Vec<Keyframe>>,
}

/// A directory of saved sequences.
#[derive(Debug, Clone)]
pub struct SequenceLibrary {
    directory: PathBuf,
}

impl SequenceLibrary {
    /// Open a library rooted at `directory`. The directory is created
    /// lazily on first save.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The library's root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Names of every saved sequence, sorted. A missing or unreadable
    /// directory lists as empty.
    pub fn names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.directory) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Write the sequence to its document and clear its dirty flag.
    pub fn save(&self, sequence: &mut Sequence) -> Result<(), SequencerError> {
        let path = self.path_for(sequence.name())?;
        fs::create_dir_all(&self.directory)?;

        let doc = SequenceDoc {
            name: sequence.name().to_owned(),
            tracks: sequence
                .tracks()
                .filter(|(_, track)| !track.is_empty())
                .map(|(property, track)| {
                    (property.name().to_owned(), track.keyframes().to_vec())
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&doc)?;

        // Write-then-rename so a crash mid-save never truncates the
        // existing document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;

        sequence.mark_clean();
        tracing::info!(name = sequence.name(), path = %path.display(), "saved sequence");
        Ok(())
    }

    /// Load a sequence by name, replacing all in-memory state. Keyframe
    /// ids regenerate, so any selection held against the previous
    /// sequence is invalid afterward.
    pub fn load(&self, name: &str) -> Result<Sequence, SequencerError> {
        let path = self.path_for(name)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SequencerError::SequenceNotFound(name.to_owned()));
            }
            Err(err) => return Err(err.into()),
        };
        let doc: SequenceDoc = serde_json::from_str(&json)?;

        let mut tracks = IndexMap::new();
        for (key, keyframes) in doc.tracks {
            let Some(property) = Property::from_name(&key) else {
                tracing::warn!(track = %key, "skipping unknown track property");
                continue;
            };
            tracks.insert(property, Track::from_keyframes(property, keyframes));
        }

        tracing::info!(name, path = %path.display(), "loaded sequence");
        Ok(Sequence::from_parts(name, tracks))
    }

    /// Create a new empty sequence and persist it immediately, so it
    /// lists alongside the saved ones.
    pub fn create(&self, name: &str) -> Result<Sequence, SequencerError> {
        let mut sequence = Sequence::from_parts(name, IndexMap::new());
        self.save(&mut sequence)?;
        Ok(sequence)
    }

    /// Save a copy of `source` under `new_name` and return it. The copy
    /// starts with fresh history and no dirty edits.
    pub fn copy(&self, source: &Sequence, new_name: &str) -> Result<Sequence, SequencerError> {
        let tracks: IndexMap<Property, Track> = source
            .tracks()
            .map(|(property, track)| (property, track.clone()))
            .collect();
        let mut copy = Sequence::from_parts(new_name, tracks);
        self.save(&mut copy)?;
        Ok(copy)
    }

    /// Resolve a sequence name to its document path, rejecting names
    /// that would escape the library directory.
    fn path_for(&self, name: &str) -> Result<PathBuf, SequencerError> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(SequencerError::Persistence(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid sequence name: {name:?}"),
            )));
        }
        Ok(self.directory.join(format!("{name}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::KeyframeValue;

    fn sample() -> Sequence {
        let mut sequence = Sequence::new("intro");
        sequence
            .add_keyframe(Property::FieldOfView, 0.0, KeyframeValue::Float(60.0), "linear")
            .unwrap();
        sequence
            .add_keyframe(
                Property::FieldOfView,
                8.0,
                KeyframeValue::Float(30.0),
                "cubicEaseInOut",
            )
            .unwrap();
        sequence
            .add_keyframe(
                Property::CameraPosition,
                1.0,
                KeyframeValue::vec3(10.0, 5.0, -2.0),
                "linear",
            )
            .unwrap();
        sequence
            .add_keyframe(
                Property::DepthFogEnabled,
                0.0,
                KeyframeValue::Bool(true),
                "snap",
            )
            .unwrap();
        sequence
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());

        let mut original = sample();
        library.save(&mut original).unwrap();
        assert!(!original.is_dirty());

        let loaded = library.load("intro").unwrap();
        assert_eq!(loaded.name(), "intro");
        assert!(!loaded.is_dirty());
        assert!(!loaded.can_undo());

        let fov = loaded.track(Property::FieldOfView).unwrap();
        assert_eq!(fov.len(), 2);
        assert_eq!(fov.keyframes()[0].value, KeyframeValue::Float(60.0));
        assert_eq!(fov.keyframes()[1].blend, "cubicEaseInOut");
        assert_eq!(
            loaded.track(Property::CameraPosition).unwrap().keyframes()[0].value,
            KeyframeValue::vec3(10.0, 5.0, -2.0)
        );
        assert_eq!(
            loaded.track(Property::DepthFogEnabled).unwrap().keyframes()[0].value,
            KeyframeValue::Bool(true)
        );
    }

    #[test]
    fn test_load_regenerates_keyframe_ids() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());

        let mut original = sample();
        let id = original.track(Property::FieldOfView).unwrap().keyframes()[0].id;
        library.save(&mut original).unwrap();

        let loaded = library.load("intro").unwrap();
        assert!(loaded.track(Property::FieldOfView).unwrap().get(id).is_none());
    }

    #[test]
    fn test_load_missing_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());
        assert!(matches!(
            library.load("nope"),
            Err(SequencerError::SequenceNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_load_skips_unknown_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.json");
        fs::write(
            &path,
            r#"{
                "name": "odd",
                "tracks": {
                    "notARealProperty": [{"time": 0.0, "value": 1.0, "blend": "linear"}],
                    "fieldOfView": [{"time": 0.0, "value": 50.0, "blend": "linear"}]
                }
            }"#,
        )
        .unwrap();

        let library = SequenceLibrary::new(dir.path());
        let loaded = library.load("odd").unwrap();
        assert_eq!(loaded.track_count(), 1);
        assert!(loaded.track(Property::FieldOfView).is_some());
    }

    #[test]
    fn test_load_sorts_out_of_order_keyframes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrambled.json");
        fs::write(
            &path,
            r#"{
                "name": "scrambled",
                "tracks": {
                    "fieldOfView": [
                        {"time": 9.0, "value": 20.0, "blend": "linear"},
                        {"time": 1.0, "value": 60.0, "blend": "linear"},
                        {"time": 4.0, "value": 40.0, "blend": "linear"}
                    ]
                }
            }"#,
        )
        .unwrap();

        let library = SequenceLibrary::new(dir.path());
        let loaded = library.load("scrambled").unwrap();
        let times: Vec<f32> = loaded
            .track(Property::FieldOfView)
            .unwrap()
            .keyframes()
            .iter()
            .map(|k| k.time)
            .collect();
        assert_eq!(times, vec![1.0, 4.0, 9.0]);
    }

    #[test]
    fn test_names_lists_saved_sequences_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());
        assert!(library.names().is_empty());

        library.create("zoom").unwrap();
        library.create("approach").unwrap();
        // Non-JSON files are ignored.
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert_eq!(library.names(), vec!["approach", "zoom"]);
    }

    #[test]
    fn test_copy_preserves_tracks_under_new_name() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());

        let mut original = sample();
        library.save(&mut original).unwrap();
        let copy = library.copy(&original, "intro take 2").unwrap();
        assert_eq!(copy.name(), "intro take 2");
        assert_eq!(copy.track_count(), original.track_count());

        let reloaded = library.load("intro take 2").unwrap();
        assert_eq!(reloaded.track(Property::FieldOfView).unwrap().len(), 2);
    }

    #[test]
    fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());
        for name in ["", "../evil", "a/b", "a\\b"] {
            assert!(library.load(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let library = SequenceLibrary::new(dir.path());
        library.save(&mut sample()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
