use crate::error::{Error, Result};
use crate::format::Color;
use crate::label::DEFAULT_LINE_INDEX_INCREMENT;
use crate::text::DecimalFormat;
use serde_json::{Map, Value, json};

const DEFAULT_PIE_CHART_COLORS: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#bcf60c",
];

/// Document-wide settings, stored as a JSON object with dotted-path access.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig(Value);

impl Default for DocumentConfig {
    fn default() -> Self {
        Self(json!({
            "labels": { "lineIndexIncrement": DEFAULT_LINE_INDEX_INCREMENT },
            "undo": { "limit": 100 },
            "decimal": { "minFractionDigits": 0, "maxFractionDigits": 6 },
            "pieChart": { "colors": DEFAULT_PIE_CHART_COLORS },
        }))
    }
}

impl DocumentConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses `text` as JSON and merges it over the built-in defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                message: "top-level value must be an object".to_string(),
            });
        }
        let mut config = Self::default();
        config.deep_merge(&overrides);
        Ok(config)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.lookup(dotted_path)?.as_bool()
    }

    pub fn get_i64(&self, dotted_path: &str) -> Option<i64> {
        self.lookup(dotted_path)?.as_i64()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    pub fn line_index_increment(&self) -> i64 {
        self.get_i64("labels.lineIndexIncrement")
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_LINE_INDEX_INCREMENT)
    }

    /// Maximum undo depth; `None` means unlimited.
    pub fn undo_limit(&self) -> Option<usize> {
        match self.get_i64("undo.limit") {
            Some(0) => None,
            Some(v) if v > 0 => Some(v as usize),
            _ => Some(100),
        }
    }

    pub fn decimal_format(&self) -> DecimalFormat {
        let defaults = DecimalFormat::default();
        let min = self
            .get_i64("decimal.minFractionDigits")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(defaults.min_fraction_digits);
        let max = self
            .get_i64("decimal.maxFractionDigits")
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(defaults.max_fraction_digits);
        DecimalFormat::new(min, max)
    }

    pub fn pie_chart_palette(&self) -> Result<PieChartPalette> {
        let Some(colors) = self.lookup("pieChart.colors") else {
            return Ok(PieChartPalette::default());
        };
        let Some(colors) = colors.as_array() else {
            return Err(Error::InvalidConfig {
                message: "pieChart.colors must be an array".to_string(),
            });
        };
        let parsed = colors
            .iter()
            .map(|c| {
                let literal = c.as_str().unwrap_or_default();
                literal.parse::<Color>().map_err(|e| Error::InvalidConfig {
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PieChartPalette::new(parsed))
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Default sector colors for pie chart labels. Sections beyond the palette size wrap around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieChartPalette {
    colors: Vec<Color>,
}

impl Default for PieChartPalette {
    fn default() -> Self {
        let colors = DEFAULT_PIE_CHART_COLORS
            .iter()
            .filter_map(|c| c.parse().ok())
            .collect();
        Self { colors }
    }
}

impl PieChartPalette {
    pub fn new(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        self.colors[index % self.colors.len()]
    }
}
