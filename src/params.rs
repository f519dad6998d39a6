//! Serializable edit parameters.
//!
//! An [`EditParameters`] value captures every cosmetic edit the user can make.
//! It is a plain value: the session owns it, replaces it wholesale on every
//! change and resets it to [`EditParameters::default`] when a new source image
//! is loaded.
//!
//! # JSON Format
//!
//! Every field is optional when deserializing; missing fields take their
//! default value.
//!
//! ```json
//! {
//!   "adjustments": { "brightness": 0.1, "contrast": 0.0, "saturation": 0.0, "hue": 0.0 },
//!   "shape": { "kind": "rounded", "cornerRadiusPercent": 20.0 },
//!   "paddingPercent": 8.0,
//!   "background": { "enabled": true, "color": "#FFFFFFFF" },
//!   "overlay": { "kind": "beta", "color": "#FF3B30FF" }
//! }
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Ranges
// ============================================================================

pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = -0.5..=0.5;
pub const CONTRAST_RANGE: RangeInclusive<f32> = -0.5..=0.5;
pub const SATURATION_RANGE: RangeInclusive<f32> = -1.0..=1.0;
pub const HUE_RANGE: RangeInclusive<f32> = -0.5..=0.5;
pub const CORNER_RADIUS_RANGE: RangeInclusive<f32> = 0.0..=60.0;
pub const PADDING_RANGE: RangeInclusive<f32> = 0.0..=60.0;
pub const BORDER_WIDTH_RANGE: RangeInclusive<f32> = 1.0..=15.0;
pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 8.0..=40.0;
pub const ROTATION_RANGE: RangeInclusive<f32> = -90.0..=90.0;

fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return 0.0_f32.clamp(*range.start(), *range.end());
    }
    value.clamp(*range.start(), *range.end())
}

// ============================================================================
// Color
// ============================================================================

/// A straight-alpha sRGB color.
///
/// Serializes as a `#RRGGBBAA` hex string and parses `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CLEAR: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// The system blue used as the default tint and border color.
    pub const BLUE: Self = Self::rgb(0, 122, 255);
    /// The system red used as the default overlay color.
    pub const RED: Self = Self::rgb(255, 59, 48);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb` without alpha, for SVG attributes.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Hue angle in degrees (0-360), using HSL.
    pub fn hue_degrees(&self) -> f32 {
        let rgb = Srgb::new(self.r, self.g, self.b).into_format::<f32>();
        let hsl: Hsl = rgb.into_color();
        hsl.hue.into_positive_degrees()
    }

    pub fn to_skia(&self) -> resvg::tiny_skia::Color {
        resvg::tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for Color {
    fn schema_name() -> String {
        "Color".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

// ============================================================================
// Settings Groups
// ============================================================================

/// Color adjustments applied before tinting.
///
/// Every field is neutral at `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct Adjustments {
    /// Additive offset, -0.5 to 0.5.
    pub brightness: f32,
    /// Contrast delta, -0.5 to 0.5 (factor 0.5 to 1.5).
    pub contrast: f32,
    /// Saturation delta, -1 to 1 (factor 0 to 2).
    pub saturation: f32,
    /// Hue rotation as a fraction of pi, -0.5 to 0.5.
    pub hue: f32,
}

impl Adjustments {
    /// Returns a copy with every field clamped to its range.
    pub fn clamped(&self) -> Self {
        Self {
            brightness: clamp_to(self.brightness, &BRIGHTNESS_RANGE),
            contrast: clamp_to(self.contrast, &CONTRAST_RANGE),
            saturation: clamp_to(self.saturation, &SATURATION_RANGE),
            hue: clamp_to(self.hue, &HUE_RANGE),
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}

/// Constant-color tint blended over the image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct TintSettings {
    pub enabled: bool,
    pub color: Color,
    /// 0 leaves the image untouched, 1 replaces its color entirely.
    pub intensity: f32,
}

impl Default for TintSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::BLUE,
            intensity: 0.5,
        }
    }
}

/// Outline the image is clipped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Square,
    Rounded,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeSettings {
    pub kind: ShapeKind,
    /// Corner radius as a percentage of the shorter canvas side.
    pub corner_radius_percent: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Square,
            corner_radius_percent: 20.0,
        }
    }
}

impl ShapeSettings {
    pub fn corner_radius_percent(&self) -> f32 {
        clamp_to(self.corner_radius_percent, &CORNER_RADIUS_RANGE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSettings {
    pub enabled: bool,
    pub color: Color,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::CLEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct BorderSettings {
    pub enabled: bool,
    /// Stroke width in source-image pixels.
    pub width_px: f32,
    pub color: Color,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            width_px: 4.0,
            color: Color::BLUE,
        }
    }
}

impl BorderSettings {
    pub fn width_px(&self) -> f32 {
        clamp_to(self.width_px, &BORDER_WIDTH_RANGE)
    }
}

/// Which label the text overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum OverlayKind {
    #[default]
    None,
    Beta,
    Dev,
    Alpha,
    Staging,
    Test,
    Custom,
}

impl OverlayKind {
    /// The fixed label for the keyword kinds.
    ///
    /// `None` and `Custom` have no fixed label.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::Beta => Some("BETA"),
            Self::Dev => Some("DEV"),
            Self::Alpha => Some("ALPHA"),
            Self::Staging => Some("STAGING"),
            Self::Test => Some("TEST"),
            Self::None | Self::Custom => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct OverlaySettings {
    pub kind: OverlayKind,
    /// Text used when `kind` is `custom`.
    pub custom_text: String,
    pub color: Color,
    /// Font size in source-image pixels.
    pub font_size: f32,
    /// Rotation around the text center; positive is counter-clockwise.
    pub rotation_degrees: f32,
    /// Vertical placement of the text center, 0 at the top edge and 1 at the bottom.
    pub vertical_position: f32,
    pub opacity: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            kind: OverlayKind::None,
            custom_text: String::new(),
            color: Color::RED,
            font_size: 18.0,
            rotation_degrees: -45.0,
            vertical_position: 0.5,
            opacity: 0.8,
        }
    }
}

impl OverlaySettings {
    /// The text to draw, or `None` when nothing should be drawn.
    pub fn resolved_text(&self) -> Option<&str> {
        let text = match self.kind {
            OverlayKind::None => return None,
            OverlayKind::Custom => self.custom_text.as_str(),
            kind => kind.keyword()?,
        };
        (!text.trim().is_empty()).then_some(text)
    }

    pub fn font_size(&self) -> f32 {
        clamp_to(self.font_size, &FONT_SIZE_RANGE)
    }

    pub fn rotation_degrees(&self) -> f32 {
        clamp_to(self.rotation_degrees, &ROTATION_RANGE)
    }

    pub fn vertical_position(&self) -> f32 {
        clamp_to(self.vertical_position, &(0.0..=1.0))
    }

    pub fn opacity(&self) -> f32 {
        clamp_to(self.opacity, &(0.0..=1.0))
    }
}

// ============================================================================
// EditParameters
// ============================================================================

/// Every user-chosen edit, in one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(default, rename_all = "camelCase")]
pub struct EditParameters {
    pub adjustments: Adjustments,
    pub tint: TintSettings,
    pub shape: ShapeSettings,
    /// Padding as a percentage of the shorter canvas side.
    pub padding_percent: f32,
    pub background: BackgroundSettings,
    pub border: BorderSettings,
    pub overlay: OverlaySettings,
}

impl EditParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adjustments(mut self, adjustments: Adjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_tint(mut self, tint: TintSettings) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_shape(mut self, shape: ShapeSettings) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_padding_percent(mut self, padding_percent: f32) -> Self {
        self.padding_percent = padding_percent;
        self
    }

    pub fn with_background(mut self, background: BackgroundSettings) -> Self {
        self.background = background;
        self
    }

    pub fn with_border(mut self, border: BorderSettings) -> Self {
        self.border = border;
        self
    }

    pub fn with_overlay(mut self, overlay: OverlaySettings) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn padding_percent(&self) -> f32 {
        clamp_to(self.padding_percent, &PADDING_RANGE)
    }

    /// Serializes the parameters to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the parameters to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes parameters from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON Schema describing the serialized form.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EditParameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parse_and_display() {
        let c: Color = "#FF8000".parse().unwrap();
        assert_eq!(c, Color::rgb(255, 128, 0));
        assert_eq!(c.to_string(), "#FF8000FF");

        let c: Color = "#11223344".parse().unwrap();
        assert_eq!(c, Color::rgba(0x11, 0x22, 0x33, 0x44));
        assert_eq!(c.to_rgb_hex(), "#112233");
    }

    #[test]
    fn color_rejects_bad_input() {
        for bad in ["FF8000", "#FF80", "#GG0000", "#FF8000FF00", "#ÿÿÿ"] {
            assert!(bad.parse::<Color>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn color_hue() {
        assert!((Color::rgb(255, 0, 0).hue_degrees() - 0.0).abs() < 0.5);
        assert!((Color::rgb(0, 0, 255).hue_degrees() - 240.0).abs() < 0.5);
    }

    #[test]
    fn defaults_match_editor() {
        let params = EditParameters::default();
        assert!(params.adjustments.is_neutral());
        assert!(!params.tint.enabled);
        assert_eq!(params.tint.intensity, 0.5);
        assert_eq!(params.shape.kind, ShapeKind::Square);
        assert_eq!(params.shape.corner_radius_percent, 20.0);
        assert_eq!(params.padding_percent, 0.0);
        assert!(!params.background.enabled);
        assert!(!params.border.enabled);
        assert_eq!(params.border.width_px, 4.0);
        assert_eq!(params.overlay.kind, OverlayKind::None);
        assert_eq!(params.overlay.font_size, 18.0);
        assert_eq!(params.overlay.rotation_degrees, -45.0);
        assert_eq!(params.overlay.vertical_position, 0.5);
        assert_eq!(params.overlay.opacity, 0.8);
    }

    #[test]
    fn overlay_text_resolution() {
        let mut overlay = OverlaySettings::default();
        assert_eq!(overlay.resolved_text(), None);

        overlay.kind = OverlayKind::Staging;
        assert_eq!(overlay.resolved_text(), Some("STAGING"));

        overlay.kind = OverlayKind::Dev;
        assert_eq!(overlay.resolved_text(), Some("DEV"));

        overlay.kind = OverlayKind::Custom;
        assert_eq!(overlay.resolved_text(), None);
        overlay.custom_text = "RC1".into();
        assert_eq!(overlay.resolved_text(), Some("RC1"));
    }

    #[test]
    fn values_are_clamped_on_use() {
        let adjustments = Adjustments {
            brightness: 3.0,
            contrast: -3.0,
            saturation: f32::NAN,
            hue: 0.25,
        }
        .clamped();
        assert_eq!(adjustments.brightness, 0.5);
        assert_eq!(adjustments.contrast, -0.5);
        assert_eq!(adjustments.saturation, 0.0);
        assert_eq!(adjustments.hue, 0.25);

        let overlay = OverlaySettings {
            font_size: 200.0,
            opacity: 1.5,
            ..OverlaySettings::default()
        };
        assert_eq!(overlay.font_size(), 40.0);
        assert_eq!(overlay.opacity(), 1.0);
    }

    #[test]
    fn json_roundtrip_uses_camel_case() {
        let params = EditParameters::new()
            .with_padding_percent(12.0)
            .with_shape(ShapeSettings {
                kind: ShapeKind::Circle,
                corner_radius_percent: 20.0,
            });

        let json = params.to_json_pretty().unwrap();
        assert!(json.contains("\"paddingPercent\""));
        assert!(json.contains("\"cornerRadiusPercent\""));
        assert!(json.contains("\"circle\""));

        let restored = EditParameters::from_json(&json).unwrap();
        assert_eq!(restored, params);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params =
            EditParameters::from_json(r##"{"overlay":{"kind":"beta","color":"#00FF00"}}"##)
                .unwrap();
        assert_eq!(params.overlay.kind, OverlayKind::Beta);
        assert_eq!(params.overlay.color, Color::rgb(0, 255, 0));
        assert_eq!(params.overlay.font_size, 18.0);
        assert_eq!(params.shape, ShapeSettings::default());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(
            EditParameters::from_json("{}").unwrap(),
            EditParameters::default()
        );
    }
}
