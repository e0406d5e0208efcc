// SPDX-License-Identifier: MIT OR Apache-2.0
//! The fixed set of animatable render properties.
//!
//! Each property maps to one parameter of the game's replay render API
//! and has a fixed value shape; a track never mixes shapes.

use crate::keyframe::ValueKind;
use std::fmt;

/// An animatable render/camera property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Camera position in world space.
    CameraPosition,
    /// Camera rotation (euler angles, degrees).
    CameraRotation,
    /// Replay playback speed multiplier.
    PlaybackSpeed,
    /// Camera field of view in degrees.
    FieldOfView,
    /// Near clipping plane distance.
    NearClip,
    /// Far clipping plane distance.
    FarClip,
    /// Navigation grid vertical offset.
    NavGridOffset,
    /// Skybox rotation in degrees.
    SkyboxRotation,
    /// Skybox sphere radius.
    SkyboxRadius,
    /// Skybox vertical offset.
    SkyboxOffset,
    /// Sun direction vector.
    SunDirection,
    /// Whether depth fog is rendered.
    DepthFogEnabled,
    /// Depth fog start distance.
    DepthFogStart,
    /// Depth fog end distance.
    DepthFogEnd,
    /// Depth fog intensity.
    DepthFogIntensity,
    /// Depth fog color.
    DepthFogColor,
    /// Whether height fog is rendered.
    HeightFogEnabled,
    /// Height fog start height.
    HeightFogStart,
    /// Height fog end height.
    HeightFogEnd,
    /// Height fog intensity.
    HeightFogIntensity,
    /// Height fog color.
    HeightFogColor,
    /// Whether depth of field is rendered.
    DepthOfFieldEnabled,
    /// Depth of field circle of confusion size.
    DepthOfFieldCircle,
    /// Depth of field focus band width.
    DepthOfFieldWidth,
    /// Depth of field near blur distance.
    DepthOfFieldNear,
    /// Depth of field focus distance.
    DepthOfFieldMid,
    /// Depth of field far blur distance.
    DepthOfFieldFar,
}

impl Property {
    /// Every animatable property, in track display order.
    pub const ALL: [Property; 27] = [
        Self::CameraPosition,
        Self::CameraRotation,
        Self::PlaybackSpeed,
        Self::FieldOfView,
        Self::NearClip,
        Self::FarClip,
        Self::NavGridOffset,
        Self::SkyboxRotation,
        Self::SkyboxRadius,
        Self::SkyboxOffset,
        Self::SunDirection,
        Self::DepthFogEnabled,
        Self::DepthFogStart,
        Self::DepthFogEnd,
        Self::DepthFogIntensity,
        Self::DepthFogColor,
        Self::HeightFogEnabled,
        Self::HeightFogStart,
        Self::HeightFogEnd,
        Self::HeightFogIntensity,
        Self::HeightFogColor,
        Self::DepthOfFieldEnabled,
        Self::DepthOfFieldCircle,
        Self::DepthOfFieldWidth,
        Self::DepthOfFieldNear,
        Self::DepthOfFieldMid,
        Self::DepthOfFieldFar,
    ];

    /// The wire name used by the render API and in sequence documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraPosition => "cameraPosition",
            Self::CameraRotation => "cameraRotation",
            Self::PlaybackSpeed => "playbackSpeed",
            Self::FieldOfView => "fieldOfView",
            Self::NearClip => "nearClip",
            Self::FarClip => "farClip",
            Self::NavGridOffset => "navGridOffset",
            Self::SkyboxRotation => "skyboxRotation",
            Self::SkyboxRadius => "skyboxRadius",
            Self::SkyboxOffset => "skyboxOffset",
            Self::SunDirection => "sunDirection",
            Self::DepthFogEnabled => "depthFogEnabled",
            Self::DepthFogStart => "depthFogStart",
            Self::DepthFogEnd => "depthFogEnd",
            Self::DepthFogIntensity => "depthFogIntensity",
            Self::DepthFogColor => "depthFogColor",
            Self::HeightFogEnabled => "heightFogEnabled",
            Self::HeightFogStart => "heightFogStart",
            Self::HeightFogEnd => "heightFogEnd",
            Self::HeightFogIntensity => "heightFogIntensity",
            Self::HeightFogColor => "heightFogColor",
            Self::DepthOfFieldEnabled => "depthOfFieldEnabled",
            Self::DepthOfFieldCircle => "depthOfFieldCircle",
            Self::DepthOfFieldWidth => "depthOfFieldWidth",
            Self::DepthOfFieldNear => "depthOfFieldNear",
            Self::DepthOfFieldMid => "depthOfFieldMid",
            Self::DepthOfFieldFar => "depthOfFieldFar",
        }
    }

    /// Human readable label for track headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CameraPosition => "Camera Position",
            Self::CameraRotation => "Camera Rotation",
            Self::PlaybackSpeed => "Playback Speed",
            Self::FieldOfView => "Field of View",
            Self::NearClip => "Near Clip",
            Self::FarClip => "Far Clip",
            Self::NavGridOffset => "Nav Grid Offset",
            Self::SkyboxRotation => "Skybox Rotation",
            Self::SkyboxRadius => "Skybox Radius",
            Self::SkyboxOffset => "Skybox Offset",
            Self::SunDirection => "Sun Direction",
            Self::DepthFogEnabled => "Depth Fog Enabled",
            Self::DepthFogStart => "Depth Fog Start",
            Self::DepthFogEnd => "Depth Fog End",
            Self::DepthFogIntensity => "Depth Fog Intensity",
            Self::DepthFogColor => "Depth Fog Color",
            Self::HeightFogEnabled => "Height Fog Enabled",
            Self::HeightFogStart => "Height Fog Start",
            Self::HeightFogEnd => "Height Fog End",
            Self::HeightFogIntensity => "Height Fog Intensity",
            Self::HeightFogColor => "Height Fog Color",
            Self::DepthOfFieldEnabled => "Depth of Field Enabled",
            Self::DepthOfFieldCircle => "Depth of Field Circle",
            Self::DepthOfFieldWidth => "Depth of Field Width",
            Self::DepthOfFieldNear => "Depth of Field Near",
            Self::DepthOfFieldMid => "Depth of Field Mid",
            Self::DepthOfFieldFar => "Depth of Field Far",
        }
    }

    /// The value shape this property's track stores.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::CameraPosition | Self::CameraRotation | Self::SunDirection => ValueKind::Vec3,
            Self::DepthFogEnabled | Self::HeightFogEnabled | Self::DepthOfFieldEnabled => {
                ValueKind::Bool
            }
            Self::DepthFogColor | Self::HeightFogColor => ValueKind::Color,
            _ => ValueKind::Float,
        }
    }

    /// Look up a property by its wire name.
    pub fn from_name(name: &str) -> Option<Property> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for property in Property::ALL {
            assert_eq!(Property::from_name(property.name()), Some(property));
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Property::CameraPosition.kind(), ValueKind::Vec3);
        assert_eq!(Property::FieldOfView.kind(), ValueKind::Float);
        assert_eq!(Property::DepthFogEnabled.kind(), ValueKind::Bool);
        assert_eq!(Property::HeightFogColor.kind(), ValueKind::Color);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Property::from_name("bannerOpacity"), None);
    }
}
