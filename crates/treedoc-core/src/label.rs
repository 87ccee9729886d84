//! Branch labels: text, icon and pie chart annotations organized in numbered lines above and
//! below the branch.

use crate::config::PieChartPalette;
use crate::format::{Color, LabelFormat};
use crate::text::TextElementData;
use crate::tree::NodeId;
use std::fmt;

/// Default distance between two label positions on the same line.
pub const DEFAULT_LINE_INDEX_INCREMENT: i64 = 10;

/// Highest line number a label can be placed on (per side).
pub const MAX_LABEL_LINE: usize = 1023;

/// Stable identity of a label inside a tree. Assigned when the label is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelHandle(pub(crate) u64);

impl fmt::Display for LabelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelSide {
    #[default]
    Above,
    Below,
}

/// Discriminant of [`LabelKind`], used to scope ID queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKindTag {
    Text,
    Icon,
    PieChart,
    PieChartCaption,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IconLabel {
    pub icon: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartLabel {
    /// IDs of the text labels / hidden data entries on the same node that provide the values.
    pub value_ids: Vec<String>,
    pub section_colors: Vec<Color>,
    pub width: f64,
    pub height: f64,
    pub show_internal_lines: bool,
}

impl PieChartLabel {
    pub fn new(value_ids: Vec<String>, palette: &PieChartPalette) -> Self {
        let section_colors = (0..value_ids.len()).map(|i| palette.color(i)).collect();
        Self {
            value_ids,
            section_colors,
            width: 6.0,
            height: 6.0,
            show_internal_lines: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LabelKind {
    Text(TextElementData),
    Icon(IconLabel),
    PieChart(PieChartLabel),
    /// Display-only pie chart that divides the circle uniformly among its sections.
    PieChartCaption(PieChartLabel),
}

impl LabelKind {
    pub fn tag(&self) -> LabelKindTag {
        match self {
            Self::Text(_) => LabelKindTag::Text,
            Self::Icon(_) => LabelKindTag::Icon,
            Self::PieChart(_) => LabelKindTag::PieChart,
            Self::PieChartCaption(_) => LabelKindTag::PieChartCaption,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    handle: Option<LabelHandle>,
    id: String,
    side: LabelSide,
    line_number: usize,
    line_position: i64,
    pub format: LabelFormat,
    pub kind: LabelKind,
}

impl Label {
    pub fn new(id: impl Into<String>, kind: LabelKind) -> Self {
        Self {
            handle: None,
            id: id.into(),
            side: LabelSide::Above,
            line_number: 0,
            line_position: 0,
            format: LabelFormat::default(),
            kind,
        }
    }

    pub fn text(id: impl Into<String>, data: impl Into<TextElementData>) -> Self {
        Self::new(id, LabelKind::Text(data.into()))
    }

    pub fn icon(id: impl Into<String>, icon: impl Into<String>) -> Self {
        Self::new(
            id,
            LabelKind::Icon(IconLabel {
                icon: icon.into(),
                width: 3.0,
                height: 3.0,
            }),
        )
    }

    pub fn pie_chart(id: impl Into<String>, value_ids: Vec<String>, palette: &PieChartPalette) -> Self {
        Self::new(id, LabelKind::PieChart(PieChartLabel::new(value_ids, palette)))
    }

    pub fn pie_chart_caption(
        id: impl Into<String>,
        value_ids: Vec<String>,
        palette: &PieChartPalette,
    ) -> Self {
        Self::new(
            id,
            LabelKind::PieChartCaption(PieChartLabel::new(value_ids, palette)),
        )
    }

    /// Places the label at `side`, line `line_number` (0-based, at most [`MAX_LABEL_LINE`]) and
    /// `line_position`.
    pub fn at(mut self, side: LabelSide, line_number: usize, line_position: i64) -> Self {
        self.side = side;
        self.line_number = line_number.min(MAX_LABEL_LINE);
        self.line_position = line_position;
        self
    }

    pub fn handle(&self) -> Option<LabelHandle> {
        self.handle
    }

    pub(crate) fn set_handle(&mut self, handle: LabelHandle) {
        self.handle = Some(handle);
    }

    pub(crate) fn clear_handle(&mut self) {
        self.handle = None;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    pub fn side(&self) -> LabelSide {
        self.side
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn line_position(&self) -> i64 {
        self.line_position
    }

    pub fn tag(&self) -> LabelKindTag {
        self.kind.tag()
    }

    pub fn text_data(&self) -> Option<&TextElementData> {
        match &self.kind {
            LabelKind::Text(data) => Some(data),
            _ => None,
        }
    }

    pub fn pie_chart_data(&self) -> Option<&PieChartLabel> {
        match &self.kind {
            LabelKind::PieChart(p) | LabelKind::PieChartCaption(p) => Some(p),
            _ => None,
        }
    }

    pub(crate) fn pie_chart_data_mut(&mut self) -> Option<&mut PieChartLabel> {
        match &mut self.kind {
            LabelKind::PieChart(p) | LabelKind::PieChartCaption(p) => Some(p),
            _ => None,
        }
    }
}

/// One row of labels, ordered by line position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelLine {
    labels: Vec<Label>,
}

impl LabelLine {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    fn insert_sorted(&mut self, mut label: Label, increment: i64) -> usize {
        let increment = increment.max(2);
        let mut index = self
            .labels
            .partition_point(|l| l.line_position < label.line_position);

        if self
            .labels
            .get(index)
            .is_some_and(|l| l.line_position == label.line_position)
        {
            // Skip every label sharing the position, then nudge in between.
            let taken = label.line_position;
            while self
                .labels
                .get(index)
                .is_some_and(|l| l.line_position == taken)
            {
                index += 1;
            }
            let nudged = match self.labels.get(index) {
                None => taken.checked_add(increment),
                Some(next) => Some(midpoint(taken, next.line_position)).filter(|&mid| mid > taken),
            };
            label.line_position = match nudged {
                Some(position) => position,
                None => {
                    let step = self.respace(increment);
                    let prev = self.labels[index - 1].line_position;
                    match self.labels.get(index) {
                        Some(next) => midpoint(prev, next.line_position),
                        None => prev + step,
                    }
                }
            };
        }

        self.labels.insert(index, label);
        index
    }

    /// Renumbers the line evenly and returns the step used. The step shrinks below `increment`
    /// when the line would not fit into `i64` otherwise.
    fn respace(&mut self, increment: i64) -> i64 {
        let slots = i64::try_from(self.labels.len() + 1).unwrap_or(i64::MAX);
        let step = increment.min(i64::MAX / slots).max(2);
        for (i, l) in self.labels.iter_mut().enumerate() {
            l.line_position = i as i64 * step;
        }
        step
    }
}

/// Position halfway between `low` and `high`, rounded towards `low`.
fn midpoint(low: i64, high: i64) -> i64 {
    let mid = i128::from(low) + (i128::from(high) - i128::from(low)) / 2;
    i64::try_from(mid).unwrap_or(low)
}

/// Labels of one branch: two independent blocks of [`LabelLine`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    owner: Option<NodeId>,
    above: Vec<LabelLine>,
    below: Vec<LabelLine>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node whose afferent branch carries these labels.
    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: NodeId) {
        self.owner = Some(owner);
    }

    fn side(&self, side: LabelSide) -> &Vec<LabelLine> {
        match side {
            LabelSide::Above => &self.above,
            LabelSide::Below => &self.below,
        }
    }

    fn side_mut(&mut self, side: LabelSide) -> &mut Vec<LabelLine> {
        match side {
            LabelSide::Above => &mut self.above,
            LabelSide::Below => &mut self.below,
        }
    }

    pub fn line_count(&self, side: LabelSide) -> usize {
        self.side(side).len()
    }

    pub fn line(&self, side: LabelSide, line_number: usize) -> Option<&LabelLine> {
        self.side(side).get(line_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.above
            .iter()
            .chain(self.below.iter())
            .flat_map(|line| line.labels.iter())
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Label> {
        self.above
            .iter_mut()
            .chain(self.below.iter_mut())
            .flat_map(|line| line.labels.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn get(&self, handle: LabelHandle) -> Option<&Label> {
        self.iter().find(|l| l.handle == Some(handle))
    }

    /// Mutable access to a label. ID and placement can only be changed through the tree.
    pub fn get_mut(&mut self, handle: LabelHandle) -> Option<LabelMut<'_>> {
        self.iter_mut()
            .find(|l| l.handle == Some(handle))
            .map(|label| LabelMut { label })
    }

    pub fn by_id(&self, id: &str) -> Option<&Label> {
        if id.is_empty() {
            return None;
        }
        self.iter().find(|l| l.id == id)
    }

    pub(crate) fn by_id_mut(&mut self, id: &str) -> Option<&mut Label> {
        if id.is_empty() {
            return None;
        }
        self.iter_mut().find(|l| l.id == id)
    }

    pub(crate) fn labels_mut(&mut self) -> impl Iterator<Item = &mut Label> {
        self.iter_mut()
    }

    /// Inserts `label` into the line named by its format, growing the line array as needed and
    /// keeping the line sorted by position. Returns the position the label ended up at.
    pub(crate) fn add(&mut self, label: Label, increment: i64) -> i64 {
        let lines = self.side_mut(label.side);
        if lines.len() <= label.line_number {
            lines.resize_with(label.line_number + 1, LabelLine::default);
        }
        let line = &mut lines[label.line_number];
        let index = line.insert_sorted(label, increment);
        line.labels[index].line_position
    }

    pub(crate) fn remove(&mut self, handle: LabelHandle) -> Option<Label> {
        for line in self.above.iter_mut().chain(self.below.iter_mut()) {
            if let Some(pos) = line.labels.iter().position(|l| l.handle == Some(handle)) {
                return Some(line.labels.remove(pos));
            }
        }
        None
    }

    pub(crate) fn remove_by_id(&mut self, id: &str) -> Option<Label> {
        if id.is_empty() {
            return None;
        }
        for line in self.above.iter_mut().chain(self.below.iter_mut()) {
            if let Some(pos) = line.labels.iter().position(|l| l.id == id) {
                return Some(line.labels.remove(pos));
            }
        }
        None
    }

    pub(crate) fn take_all(&mut self) -> Vec<Label> {
        let mut out = Vec::new();
        for line in self.above.drain(..).chain(self.below.drain(..)) {
            out.extend(line.labels);
        }
        out
    }
}

/// Mutable view of a label that keeps its ID and line placement read-only.
#[derive(Debug)]
pub struct LabelMut<'a> {
    label: &'a mut Label,
}

impl LabelMut<'_> {
    pub fn label(&self) -> &Label {
        self.label
    }

    pub fn format_mut(&mut self) -> &mut LabelFormat {
        &mut self.label.format
    }

    pub fn set_text_data(&mut self, data: TextElementData) -> bool {
        match &mut self.label.kind {
            LabelKind::Text(slot) => {
                *slot = data;
                true
            }
            _ => false,
        }
    }

    pub fn icon_mut(&mut self) -> Option<&mut IconLabel> {
        match &mut self.label.kind {
            LabelKind::Icon(icon) => Some(icon),
            _ => None,
        }
    }

    pub fn pie_chart_mut(&mut self) -> Option<&mut PieChartLabel> {
        self.label.pie_chart_data_mut()
    }
}
