// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the sequencer.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a keyframe.
///
/// Ids identify keyframes for the lifetime of an editing session only;
/// they are not persisted and regenerate on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The shape of a keyframe value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Scalar float.
    Float,
    /// Boolean toggle.
    Bool,
    /// 3-component vector.
    Vec3,
    /// RGBA color, channels in `[0, 1]`.
    Color,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Vec3 => "vector",
            Self::Color => "color",
        };
        f.write_str(name)
    }
}

/// Value stored in a keyframe.
///
/// Serializes to the document/wire form: a bare number or bool, an
/// `{x, y, z}` object for vectors, or an `{r, g, b, a}` object for colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyframeValue {
    /// Boolean toggle.
    Bool(bool),
    /// Scalar float.
    Float(f32),
    /// 3-component vector.
    Vec3 {
        /// X component.
        x: f32,
        /// Y component.
        y: f32,
        /// Z component.
        z: f32,
    },
    /// RGBA color, channels in `[0, 1]`.
    Color {
        /// Red channel.
        r: f32,
        /// Green channel.
        g: f32,
        /// Blue channel.
        b: f32,
        /// Alpha channel.
        a: f32,
    },
}

/// Linear interpolation between two floats.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl KeyframeValue {
    /// Build a vector value.
    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Self::Vec3 { x, y, z }
    }

    /// Build a color value.
    pub fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::Color { r, g, b, a }
    }

    /// The shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Vec3 { .. } => ValueKind::Vec3,
            Self::Color { .. } => ValueKind::Color,
        }
    }

    /// Get as float if possible.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if possible.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as vector components if possible.
    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Self::Vec3 { x, y, z } => Some([*x, *y, *z]),
            _ => None,
        }
    }

    /// Get as color channels if possible.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color { r, g, b, a } => Some([*r, *g, *b, *a]),
            _ => None,
        }
    }

    /// Blend toward `other` by the eased fraction `e`.
    ///
    /// Floats, vectors and colors interpolate linearly in `e`. Booleans
    /// never ease: the value holds `self` for the whole span and only
    /// switches once playback reaches the next keyframe's time, which the
    /// bracketing logic in [`crate::track::Track::evaluate`] handles.
    /// Mismatched shapes yield `None`.
    pub fn blend_with(&self, other: &KeyframeValue, e: f32) -> Option<KeyframeValue> {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => Some(Self::Float(lerp(*a, *b, e))),
            (Self::Bool(a), Self::Bool(_)) => Some(Self::Bool(*a)),
            (
                Self::Vec3 { x, y, z },
                Self::Vec3 {
                    x: bx,
                    y: by,
                    z: bz,
                },
            ) => Some(Self::Vec3 {
                x: lerp(*x, *bx, e),
                y: lerp(*y, *by, e),
                z: lerp(*z, *bz, e),
            }),
            (
                Self::Color { r, g, b, a },
                Self::Color {
                    r: br,
                    g: bg,
                    b: bb,
                    a: ba,
                },
            ) => Some(Self::Color {
                r: lerp(*r, *br, e),
                g: lerp(*g, *bg, e),
                b: lerp(*b, *bb, e),
                a: lerp(*a, *ba, e),
            }),
            _ => None,
        }
    }
}

/// A keyframe in a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Session-local keyframe ID, regenerated on load.
    #[serde(skip, default)]
    pub id: KeyframeId,
    /// Time in seconds, never negative.
    pub time: f32,
    /// Value at this keyframe.
    pub value: KeyframeValue,
    /// Name of the blend curve easing into this keyframe.
    ///
    /// Stored as the raw name so documents carrying curve names this
    /// build does not know still round-trip unchanged.
    pub blend: String,
}

impl Keyframe {
    /// Create a new keyframe.
    pub fn new(time: f32, value: KeyframeValue, blend: impl Into<String>) -> Self {
        Self {
            id: KeyframeId::new(),
            time: time.max(0.0),
            value,
            blend: blend.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_float() {
        let a = KeyframeValue::Float(0.0);
        let b = KeyframeValue::Float(100.0);
        assert_eq!(a.blend_with(&b, 0.5), Some(KeyframeValue::Float(50.0)));
    }

    #[test]
    fn test_blend_bool_never_eases() {
        let a = KeyframeValue::Bool(false);
        let b = KeyframeValue::Bool(true);
        assert_eq!(a.blend_with(&b, 0.99), Some(KeyframeValue::Bool(false)));
        // Even overshooting curves never flip a bool mid-span.
        assert_eq!(a.blend_with(&b, 1.2), Some(KeyframeValue::Bool(false)));
    }

    #[test]
    fn test_blend_vec3_componentwise() {
        let a = KeyframeValue::vec3(0.0, 10.0, -4.0);
        let b = KeyframeValue::vec3(10.0, 20.0, 4.0);
        assert_eq!(
            a.blend_with(&b, 0.5),
            Some(KeyframeValue::vec3(5.0, 15.0, 0.0))
        );
    }

    #[test]
    fn test_blend_shape_mismatch() {
        let a = KeyframeValue::Float(1.0);
        let b = KeyframeValue::Bool(true);
        assert_eq!(a.blend_with(&b, 0.5), None);
    }

    #[test]
    fn test_value_document_forms() {
        let json = serde_json::to_value(KeyframeValue::vec3(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1.0, "y": 2.0, "z": 3.0}));

        let parsed: KeyframeValue =
            serde_json::from_value(serde_json::json!({"r": 0.1, "g": 0.2, "b": 0.3, "a": 1.0}))
                .unwrap();
        assert_eq!(parsed.kind(), ValueKind::Color);

        let parsed: KeyframeValue = serde_json::from_value(serde_json::json!(true)).unwrap();
        assert_eq!(parsed, KeyframeValue::Bool(true));

        let parsed: KeyframeValue = serde_json::from_value(serde_json::json!(2.5)).unwrap();
        assert_eq!(parsed, KeyframeValue::Float(2.5));
    }

    #[test]
    fn test_keyframe_time_clamped() {
        let kf = Keyframe::new(-3.0, KeyframeValue::Float(1.0), "linear");
        assert_eq!(kf.time, 0.0);
    }
}
