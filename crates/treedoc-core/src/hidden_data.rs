use crate::text::TextElementData;
use crate::tree::NodeId;
use indexmap::IndexMap;
use std::ops::Deref;

/// The element a [`HiddenDataMap`] is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiddenDataOwner {
    Node(NodeId),
    Branch(NodeId),
}

impl HiddenDataOwner {
    pub fn node(&self) -> NodeId {
        match self {
            Self::Node(n) | Self::Branch(n) => *n,
        }
    }
}

/// Keyed, non-visual values attached to a node or branch.
///
/// Keys share the per-node ID namespace with labels, so new keys can only be inserted through
/// [`crate::id_manager`]. Maps inside a tree are only reachable mutably through
/// [`HiddenDataMut`], which updates or removes existing entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiddenDataMap {
    owner: Option<HiddenDataOwner>,
    entries: IndexMap<String, TextElementData>,
}

impl HiddenDataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<HiddenDataOwner> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: HiddenDataOwner) {
        self.owner = Some(owner);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TextElementData> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextElementData)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replaces the value of an existing entry. Returns the previous value, or `None` (and does
    /// nothing) if `key` is not present.
    pub fn update(&mut self, key: &str, value: TextElementData) -> Option<TextElementData> {
        self.entries
            .get_mut(key)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub fn remove(&mut self, key: &str) -> Option<TextElementData> {
        self.entries.shift_remove(key)
    }

    pub(crate) fn insert(&mut self, key: String, value: TextElementData) -> Option<TextElementData> {
        self.entries.insert(key, value)
    }

    /// Renames `old` to `new` in place, keeping the entry's position.
    pub(crate) fn rename_key(&mut self, old: &str, new: &str) -> bool {
        let Some(index) = self.entries.get_index_of(old) else {
            return false;
        };
        let Some((_, value)) = self.entries.shift_remove_index(index) else {
            return false;
        };
        self.entries.shift_insert(index, new.to_string(), value);
        true
    }
}

/// Mutable view of a [`HiddenDataMap`] inside a tree. The map itself cannot be replaced.
#[derive(Debug)]
pub struct HiddenDataMut<'a> {
    map: &'a mut HiddenDataMap,
}

impl<'a> HiddenDataMut<'a> {
    pub(crate) fn new(map: &'a mut HiddenDataMap) -> Self {
        Self { map }
    }

    /// See [`HiddenDataMap::update`].
    pub fn update(&mut self, key: &str, value: TextElementData) -> Option<TextElementData> {
        self.map.update(key, value)
    }

    pub fn remove(&mut self, key: &str) -> Option<TextElementData> {
        self.map.remove(key)
    }
}

impl Deref for HiddenDataMut<'_> {
    type Target = HiddenDataMap;

    fn deref(&self) -> &HiddenDataMap {
        self.map
    }
}
