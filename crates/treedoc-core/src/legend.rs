//! Tree-wide legends anchored to nodes by unique name.

use crate::format::LegendFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LegendHandle(pub(crate) u64);

impl fmt::Display for LegendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "legend#{}", self.0)
    }
}

/// An annotation spanning the subtree between one or two anchor nodes.
///
/// Anchors are stored as node unique names, so a legend keeps pointing at the same logical node
/// when node identities are replaced (clone/paste) or the topology changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    handle: Option<LegendHandle>,
    pub text: String,
    anchor0: String,
    anchor1: Option<String>,
    /// User-assigned ordering among all legends of a tree.
    pub position: i32,
    pub format: LegendFormat,
}

impl Legend {
    pub fn new(text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            handle: None,
            text: text.into(),
            anchor0: anchor.into(),
            anchor1: None,
            position: 0,
            format: LegendFormat::default(),
        }
    }

    pub fn spanning(
        text: impl Into<String>,
        anchor0: impl Into<String>,
        anchor1: impl Into<String>,
    ) -> Self {
        let mut legend = Self::new(text, anchor0);
        legend.set_anchors(legend.anchor0.clone(), Some(anchor1.into()));
        legend
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn handle(&self) -> Option<LegendHandle> {
        self.handle
    }

    pub fn anchor0(&self) -> &str {
        &self.anchor0
    }

    pub fn anchor1(&self) -> Option<&str> {
        self.anchor1.as_deref()
    }

    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.anchor0.as_str()).chain(self.anchor1.as_deref())
    }

    pub fn is_anchored_to(&self, unique_name: &str) -> bool {
        self.anchors().any(|a| a == unique_name)
    }

    /// Sets both anchors. A second anchor equal to the first collapses to a single anchor.
    pub fn set_anchors(&mut self, anchor0: String, anchor1: Option<String>) {
        self.anchor1 = anchor1.filter(|a| *a != anchor0);
        self.anchor0 = anchor0;
    }

    /// Replaces every occurrence of `old` among the anchors by `new`.
    pub fn replace_anchor(&mut self, old: &str, new: &str) -> bool {
        if !self.is_anchored_to(old) {
            return false;
        }
        let a0 = if self.anchor0 == old {
            new.to_string()
        } else {
            self.anchor0.clone()
        };
        let a1 = self
            .anchor1
            .as_ref()
            .map(|a| if a == old { new.to_string() } else { a.clone() });
        self.set_anchors(a0, a1);
        true
    }
}

/// Ordered list of the legends of a tree, sorted by [`Legend::position`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Legends {
    entries: Vec<Legend>,
}

impl Legends {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Legend> {
        self.entries.iter()
    }

    pub fn get(&self, handle: LegendHandle) -> Option<&Legend> {
        self.entries.iter().find(|l| l.handle == Some(handle))
    }

    pub(crate) fn get_mut(&mut self, handle: LegendHandle) -> Option<&mut Legend> {
        self.entries.iter_mut().find(|l| l.handle == Some(handle))
    }

    pub fn handles(&self) -> Vec<LegendHandle> {
        self.entries.iter().filter_map(|l| l.handle).collect()
    }

    /// Inserts after every legend with a position less than or equal to the new one.
    pub(crate) fn insert(&mut self, mut legend: Legend, handle: LegendHandle) {
        legend.handle = Some(handle);
        let index = self
            .entries
            .partition_point(|l| l.position <= legend.position);
        self.entries.insert(index, legend);
    }

    pub(crate) fn remove(&mut self, handle: LegendHandle) -> Option<Legend> {
        let index = self.entries.iter().position(|l| l.handle == Some(handle))?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn sort(&mut self) {
        self.entries.sort_by_key(|l| l.position);
    }
}

/// Mutable view of a legend inside a tree. The legend keeps its handle.
#[derive(Debug)]
pub struct LegendMut<'a> {
    legend: &'a mut Legend,
}

impl<'a> LegendMut<'a> {
    pub(crate) fn new(legend: &'a mut Legend) -> Self {
        Self { legend }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.legend.text = text.into();
    }

    /// Changes the ordering key. [`crate::Tree::sort_legends`] restores the order afterwards.
    pub fn set_position(&mut self, position: i32) {
        self.legend.position = position;
    }

    pub fn format_mut(&mut self) -> &mut LegendFormat {
        &mut self.legend.format
    }

    pub fn set_anchors(&mut self, anchor0: String, anchor1: Option<String>) {
        self.legend.set_anchors(anchor0, anchor1);
    }

    pub fn replace_anchor(&mut self, old: &str, new: &str) -> bool {
        self.legend.replace_anchor(old, new)
    }
}

impl Deref for LegendMut<'_> {
    type Target = Legend;

    fn deref(&self) -> &Legend {
        self.legend
    }
}
