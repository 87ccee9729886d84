//! Per-element visual formats.
//!
//! The document model only stores these values; interpreting them is left to the paint layer.

use crate::text::DecimalFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color literal: {0:?} (expected #rrggbb)")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFormat {
    pub text_color: Color,
    pub text_height: f64,
    pub text_style: TextStyle,
    pub decimal_format: DecimalFormat,
}

impl Default for NodeFormat {
    fn default() -> Self {
        Self {
            text_color: Color::BLACK,
            text_height: 3.0,
            text_style: TextStyle::default(),
            decimal_format: DecimalFormat::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchFormat {
    pub line_color: Color,
    pub line_width: f64,
    /// Paint this branch with a fixed length regardless of its branch length value.
    pub constant_width: bool,
}

impl Default for BranchFormat {
    fn default() -> Self {
        Self {
            line_color: Color::BLACK,
            line_width: 0.3,
            constant_width: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFormat {
    pub text_color: Color,
    pub text_height: f64,
    pub text_style: TextStyle,
    pub decimal_format: DecimalFormat,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            text_color: Color::BLACK,
            text_height: 2.5,
            text_style: TextStyle::default(),
            decimal_format: DecimalFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendStyle {
    #[default]
    Bracket,
    Braces,
    TextOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendFormat {
    pub style: LegendStyle,
    pub line_color: Color,
    pub text_color: Color,
    pub text_height: f64,
    pub text_style: TextStyle,
}

impl Default for LegendFormat {
    fn default() -> Self {
        Self {
            style: LegendStyle::default(),
            line_color: Color::BLACK,
            text_color: Color::BLACK,
            text_height: 3.0,
            text_style: TextStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleBarAlignment {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBarFormat {
    pub alignment: ScaleBarAlignment,
    pub line_color: Color,
    pub line_width: f64,
    pub text_color: Color,
    pub text_height: f64,
    pub decimal_format: DecimalFormat,
}

impl Default for ScaleBarFormat {
    fn default() -> Self {
        Self {
            alignment: ScaleBarAlignment::default(),
            line_color: Color::BLACK,
            line_width: 0.3,
            text_color: Color::BLACK,
            text_height: 3.0,
            decimal_format: DecimalFormat::default(),
        }
    }
}
