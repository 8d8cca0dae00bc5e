//! Watermark configuration: a validated, immutable settings value.
//!
//! [`WatermarkConfig`] is constructed once from CLI input through
//! [`WatermarkConfigBuilder`] and never mutated afterwards. The builder
//! rejects out-of-range values at construction instead of clamping or
//! silently ignoring them, so nothing downstream needs to re-validate.
//!
//! Two derived values are computed on demand:
//! - [`WatermarkConfig::draw_color`] — the configured color with an alpha
//!   channel of `round(255 × opacity)`, ready for compositing
//! - [`WatermarkConfig::px_scale`] — the font size as an ab_glyph scale

use ab_glyph::PxScale;
use image::Rgba;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("font size must be positive, got: {0}")]
    InvalidFontSize(u32),
    #[error("opacity must be between 0.0 and 1.0, got: {0}")]
    InvalidOpacity(f32),
    #[error("invalid color format: {0}")]
    InvalidColor(String),
    #[error("unknown position: {0}")]
    InvalidPosition(String),
}

/// An opaque RGB color. Opacity lives in the config, not the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Parse a 6-digit hex color. The leading `#` is optional.
pub fn parse_hex_color(input: &str) -> Result<Rgb, ConfigError> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(input.to_string()));
    }
    let channel = |range| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| ConfigError::InvalidColor(input.to_string()))
    };
    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Where the date text is anchored on the canvas.
///
/// Parsing is case-insensitive and accepts both `BOTTOM_RIGHT` and
/// `bottom-right` spellings. An unrecognized name is an error at the parse
/// boundary — callers decide whether to fall back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "TOP_LEFT" => Ok(Position::TopLeft),
            "TOP_RIGHT" => Ok(Position::TopRight),
            "BOTTOM_LEFT" => Ok(Position::BottomLeft),
            "BOTTOM_RIGHT" => Ok(Position::BottomRight),
            "CENTER" => Ok(Position::Center),
            _ => Err(ConfigError::InvalidPosition(s.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::TopLeft => "TOP_LEFT",
            Position::TopRight => "TOP_RIGHT",
            Position::BottomLeft => "BOTTOM_LEFT",
            Position::BottomRight => "BOTTOM_RIGHT",
            Position::Center => "CENTER",
        };
        f.write_str(name)
    }
}

/// Weight of the watermark face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    Regular,
    #[default]
    Bold,
}

/// Immutable watermark settings.
///
/// Invariants (enforced by the builder): `font_size > 0`,
/// `0.0 <= opacity <= 1.0`. Margin is `u32`, so non-negativity is carried by
/// the type.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkConfig {
    font_size: u32,
    color: Rgb,
    position: Position,
    opacity: f32,
    font_family: String,
    font_weight: FontWeight,
    margin: u32,
}

impl WatermarkConfig {
    pub fn builder() -> WatermarkConfigBuilder {
        WatermarkConfigBuilder::default()
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// The configured color with the opacity baked into the alpha channel.
    pub fn draw_color(&self) -> Rgba<u8> {
        let alpha = (255.0 * self.opacity).round() as u8;
        Rgba([self.color.r, self.color.g, self.color.b, alpha])
    }

    /// Font size as a pixel scale for glyph rasterization.
    pub fn px_scale(&self) -> PxScale {
        PxScale::from(self.font_size as f32)
    }
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 24,
            color: WHITE,
            position: Position::BottomRight,
            opacity: 0.8,
            font_family: "Arial".to_string(),
            font_weight: FontWeight::Bold,
            margin: 20,
        }
    }
}

/// Fluent builder for [`WatermarkConfig`]. `build` fails fast on any
/// out-of-range value.
#[derive(Debug, Clone)]
pub struct WatermarkConfigBuilder {
    config: WatermarkConfig,
}

impl Default for WatermarkConfigBuilder {
    fn default() -> Self {
        Self {
            config: WatermarkConfig::default(),
        }
    }
}

impl WatermarkConfigBuilder {
    pub fn font_size(mut self, size: u32) -> Self {
        self.config.font_size = size;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.config.color = color;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.config.position = position;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.config.opacity = opacity;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.config.font_family = family.into();
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.config.font_weight = weight;
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.config.margin = margin;
        self
    }

    pub fn build(self) -> Result<WatermarkConfig, ConfigError> {
        let config = self.config;
        if config.font_size == 0 {
            return Err(ConfigError::InvalidFontSize(config.font_size));
        }
        // NaN fails the range check too.
        if !(0.0..=1.0).contains(&config.opacity) {
            return Err(ConfigError::InvalidOpacity(config.opacity));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = WatermarkConfig::default();
        assert_eq!(config.font_size(), 24);
        assert_eq!(config.color(), WHITE);
        assert_eq!(config.position(), Position::BottomRight);
        assert_eq!(config.opacity(), 0.8);
        assert_eq!(config.font_family(), "Arial");
        assert_eq!(config.font_weight(), FontWeight::Bold);
        assert_eq!(config.margin(), 20);
    }

    #[test]
    fn builder_accepts_valid_values() {
        let config = WatermarkConfig::builder()
            .font_size(32)
            .color(Rgb { r: 255, g: 0, b: 0 })
            .position(Position::TopLeft)
            .opacity(0.5)
            .margin(10)
            .build()
            .unwrap();
        assert_eq!(config.font_size(), 32);
        assert_eq!(config.position(), Position::TopLeft);
    }

    #[test]
    fn builder_rejects_zero_font_size() {
        let result = WatermarkConfig::builder().font_size(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidFontSize(0))));
    }

    #[test]
    fn builder_rejects_out_of_range_opacity() {
        assert!(WatermarkConfig::builder().opacity(1.2).build().is_err());
        assert!(WatermarkConfig::builder().opacity(-0.1).build().is_err());
    }

    #[test]
    fn builder_accepts_boundary_opacities() {
        assert!(WatermarkConfig::builder().opacity(0.0).build().is_ok());
        assert!(WatermarkConfig::builder().opacity(1.0).build().is_ok());
    }

    #[test]
    fn hex_color_with_and_without_prefix() {
        assert_eq!(parse_hex_color("#FF8000").unwrap(), Rgb {
            r: 255,
            g: 128,
            b: 0
        });
        assert_eq!(parse_hex_color("ff8000").unwrap(), Rgb {
            r: 255,
            g: 128,
            b: 0
        });
    }

    #[test]
    fn hex_color_rejects_junk() {
        assert!(parse_hex_color("red").is_err());
        assert!(parse_hex_color("#FFF").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn draw_color_bakes_opacity_into_alpha() {
        let config = WatermarkConfig::builder().opacity(0.8).build().unwrap();
        assert_eq!(config.draw_color(), Rgba([255, 255, 255, 204]));

        let opaque = WatermarkConfig::builder().opacity(1.0).build().unwrap();
        assert_eq!(opaque.draw_color()[3], 255);

        let clear = WatermarkConfig::builder().opacity(0.0).build().unwrap();
        assert_eq!(clear.draw_color()[3], 0);
    }

    #[test]
    fn position_parses_case_insensitively() {
        assert_eq!("TOP_LEFT".parse::<Position>().unwrap(), Position::TopLeft);
        assert_eq!("center".parse::<Position>().unwrap(), Position::Center);
        assert_eq!(
            "bottom-right".parse::<Position>().unwrap(),
            Position::BottomRight
        );
    }

    #[test]
    fn position_rejects_unknown_names() {
        assert!("MIDDLE".parse::<Position>().is_err());
        assert!("".parse::<Position>().is_err());
    }
}
