//! Tagged node/label values: empty, textual or decimal.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Controls how decimal values are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecimalFormat {
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
}

impl Default for DecimalFormat {
    fn default() -> Self {
        Self {
            min_fraction_digits: 0,
            max_fraction_digits: 6,
        }
    }
}

impl DecimalFormat {
    pub fn new(min_fraction_digits: usize, max_fraction_digits: usize) -> Self {
        Self {
            min_fraction_digits,
            max_fraction_digits: max_fraction_digits.max(min_fraction_digits),
        }
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
        }

        let mut out = format!("{:.*}", self.max_fraction_digits, value);
        if let Some(dot) = out.find('.') {
            let keep_at_least = dot + 1 + self.min_fraction_digits;
            while out.len() > keep_at_least && out.ends_with('0') {
                out.pop();
            }
            if out.ends_with('.') {
                out.pop();
            }
        }
        // `format!` keeps the sign of values that round to zero.
        if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
            out.remove(0);
        }
        out
    }
}

/// Value slot used by nodes, text labels, hidden data and data adapters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TextElementData {
    #[default]
    Empty,
    Text(String),
    Decimal(f64),
}

impl TextElementData {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn decimal(value: f64) -> Self {
        Self::Decimal(value)
    }

    /// Interprets `raw` as a decimal if it parses as one, otherwise keeps it as text.
    ///
    /// Empty (or whitespace-only) input yields [`TextElementData::Empty`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Decimal(v),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_decimal(&self) -> bool {
        matches!(self, Self::Decimal(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn set_text(&mut self, value: impl Into<String>) {
        *self = Self::Text(value.into());
    }

    pub fn set_decimal(&mut self, value: f64) {
        *self = Self::Decimal(value);
    }

    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    pub fn format(&self, decimal_format: &DecimalFormat) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Decimal(v) => decimal_format.format(*v),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Decimal(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl fmt::Display for TextElementData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&DecimalFormat::default()))
    }
}

impl From<&str> for TextElementData {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TextElementData {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for TextElementData {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

// Empty < decimal < text; decimals use a total order so NaN is comparable.
impl Ord for TextElementData {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Decimal(a), Self::Decimal(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for TextElementData {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TextElementData {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TextElementData {}
