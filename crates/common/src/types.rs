use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Decode one sRGB-encoded channel in `0.0..=1.0` to linear light.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGB colour with components in `0.0..=1.0`.
///
/// Colours picked by eye (hex codes, 8-bit triples) are sRGB-encoded and go
/// through [`Rgb::from_srgb`] or [`Rgb::from_u8`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from sRGB-encoded channels in `0.0..=1.0`.
    pub fn from_srgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
    }

    /// Build a colour from 8-bit sRGB channel values.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_srgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// The six walls that enclose a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallRole {
    Bottom,
    Top,
    Left,
    Right,
    Back,
    Front,
}

impl WallRole {
    pub const ALL: [WallRole; 6] = [
        WallRole::Bottom,
        WallRole::Top,
        WallRole::Left,
        WallRole::Right,
        WallRole::Back,
        WallRole::Front,
    ];

    /// Position of this role in [`WallRole::ALL`].
    pub fn index(self) -> usize {
        match self {
            WallRole::Bottom => 0,
            WallRole::Top => 1,
            WallRole::Left => 2,
            WallRole::Right => 3,
            WallRole::Back => 4,
            WallRole::Front => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WallRole::Bottom => "bottom",
            WallRole::Top => "top",
            WallRole::Left => "left",
            WallRole::Right => "right",
            WallRole::Back => "back",
            WallRole::Front => "front",
        }
    }
}

/// A world axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}
