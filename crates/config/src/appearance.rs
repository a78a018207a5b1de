use std::ops::{Range, RangeInclusive};

use roomview_common::Rgb;
use serde::{Deserialize, Serialize};

/// Range the configuration panel should enforce on gradient angles (degrees).
/// 360 is the same direction as 0 and is reported as out of range.
pub const GRADIENT_ANGLE_RANGE: Range<f32> = 0.0..360.0;
/// Range for pattern start/end scales.
pub const PATTERN_SCALE_RANGE: RangeInclusive<f32> = 0.0..=1.0;
/// Range for the pattern tile count.
pub const PATTERN_AMOUNT_RANGE: RangeInclusive<f32> = 0.0..=40.0;
/// Range for pattern edge blur.
pub const PATTERN_BLUR_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// Tiled motif blended over a wall's gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPattern {
    #[default]
    None,
    Circle,
    Diamond,
}

impl OverlayPattern {
    pub const ALL: [OverlayPattern; 3] = [
        OverlayPattern::None,
        OverlayPattern::Circle,
        OverlayPattern::Diamond,
    ];

    /// Numeric code the wall shader switches on.
    pub fn code(self) -> u32 {
        match self {
            OverlayPattern::None => 0,
            OverlayPattern::Circle => 1,
            OverlayPattern::Diamond => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverlayPattern::None => "none",
            OverlayPattern::Circle => "circle",
            OverlayPattern::Diamond => "diamond",
        }
    }
}

/// How the overlay pattern is coloured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PatternColor {
    /// An explicit colour.
    Rgb(Rgb),
    /// The gradient's end colour.
    InvertedGradient,
    /// White at the given opacity.
    WhiteOpacity(f32),
}

impl Default for PatternColor {
    fn default() -> Self {
        PatternColor::WhiteOpacity(0.35)
    }
}

/// Shading parameters of one wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallAppearance {
    pub color_start: Rgb,
    pub color_end: Rgb,
    pub gradient_angle_degrees: f32,
    pub overlay_pattern: OverlayPattern,
    pub pattern_color: PatternColor,
    pub pattern_start_scale: f32,
    pub pattern_end_scale: f32,
    /// Tile count across the face.
    pub pattern_amount: f32,
    pub pattern_blur: f32,
}

impl Default for WallAppearance {
    fn default() -> Self {
        Self {
            color_start: Rgb::from_u8(250, 227, 219),
            color_end: Rgb::from_u8(214, 190, 181),
            gradient_angle_degrees: 90.0,
            overlay_pattern: OverlayPattern::None,
            pattern_color: PatternColor::default(),
            pattern_start_scale: 0.2,
            pattern_end_scale: 0.6,
            pattern_amount: 8.0,
            pattern_blur: 0.1,
        }
    }
}

/// A change to exactly one appearance field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppearanceEdit {
    ColorStart(Rgb),
    ColorEnd(Rgb),
    GradientAngle(f32),
    OverlayPattern(OverlayPattern),
    PatternColor(PatternColor),
    PatternStartScale(f32),
    PatternEndScale(f32),
    PatternAmount(f32),
    PatternBlur(f32),
}

impl AppearanceEdit {
    /// Write the edited field. Values are stored as given, without range checks.
    pub fn apply_to(self, appearance: &mut WallAppearance) {
        match self {
            AppearanceEdit::ColorStart(c) => appearance.color_start = c,
            AppearanceEdit::ColorEnd(c) => appearance.color_end = c,
            AppearanceEdit::GradientAngle(a) => appearance.gradient_angle_degrees = a,
            AppearanceEdit::OverlayPattern(p) => appearance.overlay_pattern = p,
            AppearanceEdit::PatternColor(c) => appearance.pattern_color = c,
            AppearanceEdit::PatternStartScale(s) => appearance.pattern_start_scale = s,
            AppearanceEdit::PatternEndScale(s) => appearance.pattern_end_scale = s,
            AppearanceEdit::PatternAmount(n) => appearance.pattern_amount = n,
            AppearanceEdit::PatternBlur(b) => appearance.pattern_blur = b,
        }
    }
}
