use crate::format::ScaleBarFormat;
use serde::{Deserialize, Serialize};

/// Scale bar element of a tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBar {
    /// Length of the bar in branch length units. `None` lets the paint layer choose.
    pub length: Option<f64>,
    /// Distance between two scale bar ticks in branch length units.
    pub small_interval: Option<f64>,
    pub format: ScaleBarFormat,
}

impl Default for ScaleBar {
    fn default() -> Self {
        Self {
            length: None,
            small_interval: None,
            format: ScaleBarFormat::default(),
        }
    }
}
