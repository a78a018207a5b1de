use std::ops::{RangeBounds, RangeInclusive};
use std::path::Path;

use roomview_common::WallRole;
use serde::{Deserialize, Serialize};

use crate::appearance::WallAppearance;

/// Range the configuration panel should enforce on room dimensions.
pub const ROOM_DIMENSION_RANGE: RangeInclusive<f32> = 1.0..=50.0;

/// Errors from loading room configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Interior extents of the room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDimensions {
    pub length: f32,
    pub height: f32,
    pub width: f32,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            length: 10.0,
            height: 10.0,
            width: 10.0,
        }
    }
}

/// One appearance per wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSet {
    pub bottom: WallAppearance,
    pub top: WallAppearance,
    pub left: WallAppearance,
    pub right: WallAppearance,
    pub back: WallAppearance,
    pub front: WallAppearance,
}

impl WallSet {
    pub fn get(&self, role: WallRole) -> &WallAppearance {
        match role {
            WallRole::Bottom => &self.bottom,
            WallRole::Top => &self.top,
            WallRole::Left => &self.left,
            WallRole::Right => &self.right,
            WallRole::Back => &self.back,
            WallRole::Front => &self.front,
        }
    }

    pub fn get_mut(&mut self, role: WallRole) -> &mut WallAppearance {
        match role {
            WallRole::Bottom => &mut self.bottom,
            WallRole::Top => &mut self.top,
            WallRole::Left => &mut self.left,
            WallRole::Right => &mut self.right,
            WallRole::Back => &mut self.back,
            WallRole::Front => &mut self.front,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (WallRole, &WallAppearance)> {
        WallRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }
}

/// Complete room configuration: dimensions plus the six wall appearances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub room: RoomDimensions,
    pub walls: WallSet,
}

impl RoomConfig {
    /// Parse a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load startup defaults from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded room config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Fields outside the ranges the panel is expected to enforce. The store
    /// accepts such values; this is for tooling that wants to warn about them.
    pub fn out_of_range_fields(&self) -> Vec<String> {
        use crate::appearance::{
            GRADIENT_ANGLE_RANGE, PATTERN_AMOUNT_RANGE, PATTERN_BLUR_RANGE, PATTERN_SCALE_RANGE,
        };

        fn check<R: RangeBounds<f32>>(out: &mut Vec<String>, name: String, value: f32, range: &R) {
            if !range.contains(&value) {
                out.push(format!("{name} = {value}"));
            }
        }

        let mut out = Vec::new();
        let room = &self.room;
        check(&mut out, "room.length".into(), room.length, &ROOM_DIMENSION_RANGE);
        check(&mut out, "room.height".into(), room.height, &ROOM_DIMENSION_RANGE);
        check(&mut out, "room.width".into(), room.width, &ROOM_DIMENSION_RANGE);
        for (role, wall) in self.walls.iter() {
            let field = |f: &str| format!("walls.{}.{f}", role.label());
            check(
                &mut out,
                field("gradient_angle_degrees"),
                wall.gradient_angle_degrees,
                &GRADIENT_ANGLE_RANGE,
            );
            check(
                &mut out,
                field("pattern_start_scale"),
                wall.pattern_start_scale,
                &PATTERN_SCALE_RANGE,
            );
            check(
                &mut out,
                field("pattern_end_scale"),
                wall.pattern_end_scale,
                &PATTERN_SCALE_RANGE,
            );
            check(&mut out, field("pattern_amount"), wall.pattern_amount, &PATTERN_AMOUNT_RANGE);
            check(&mut out, field("pattern_blur"), wall.pattern_blur, &PATTERN_BLUR_RANGE);
        }
        out
    }
}
