use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels, e.g. `Color::from_rgb8(0x88, 0xbd, 0xe6)`.
    #[must_use]
    pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Series colors assigned by series index when a series has no explicit style.
#[must_use]
pub fn default_palette() -> Vec<Color> {
    vec![
        Color::from_rgb8(0x88, 0xbd, 0xe6),
        Color::from_rgb8(0xfb, 0xb2, 0x58),
        Color::from_rgb8(0x90, 0xcd, 0x97),
        Color::from_rgb8(0xf6, 0xaa, 0xc9),
        Color::from_rgb8(0xbf, 0xa5, 0x54),
        Color::from_rgb8(0xbc, 0x99, 0xc7),
        Color::from_rgb8(0xed, 0xdd, 0x46),
        Color::from_rgb8(0xf0, 0x7e, 0x6e),
        Color::from_rgb8(0x8c, 0x8c, 0x8c),
    ]
}

/// Mutable style cursor shared by every draw call of an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub text_fill: Option<Color>,
    pub font_size: f64,
    pub font_family: String,
}

impl Default for EngineStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            text_fill: Some(Color::BLACK),
            font_size: 12.0,
            font_family: "Sans".to_owned(),
        }
    }
}

/// Optional class tag and clip-path reference attached to a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementAttrs<'a> {
    pub class: Option<&'a str>,
    pub clip_path: Option<&'a str>,
}

impl<'a> ElementAttrs<'a> {
    pub const NONE: ElementAttrs<'static> = ElementAttrs {
        class: None,
        clip_path: None,
    };

    #[must_use]
    pub const fn class(class: &'a str) -> Self {
        Self {
            class: Some(class),
            clip_path: None,
        }
    }

    #[must_use]
    pub const fn with_clip_path(mut self, clip_path: Option<&'a str>) -> Self {
        self.clip_path = clip_path;
        self
    }
}
