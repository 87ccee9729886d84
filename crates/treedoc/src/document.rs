use crate::error::Result;
use serde_json::Value;
use treedoc_core::{DocumentConfig, PieChartPalette, Tree};
use treedoc_edit::{DocumentEdit, UndoManager};

/// A tree together with its undo history and document settings.
///
/// The tree is only reachable mutably through edits, so every change is recorded.
#[derive(Debug)]
pub struct Document {
    tree: Tree,
    undo: UndoManager,
    config: DocumentConfig,
    palette: PieChartPalette,
}

impl Default for Document {
    fn default() -> Self {
        let config = DocumentConfig::default();
        Self {
            tree: Tree::with_config(&config),
            undo: UndoManager::from_config(&config),
            palette: PieChartPalette::default(),
            config,
        }
    }
}

impl Document {
    /// An empty document with the built-in settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DocumentConfig) -> Result<Self> {
        let palette = config.pie_chart_palette()?;
        Ok(Self {
            tree: Tree::with_config(&config),
            undo: UndoManager::from_config(&config),
            config,
            palette,
        })
    }

    /// Settings given as a JSON object, merged over the defaults.
    pub fn from_config_json(text: &str) -> Result<Self> {
        Self::with_config(DocumentConfig::from_json_str(text)?)
    }

    /// Replaces the tree, e.g. after loading a file. History is discarded and the new state
    /// counts as saved.
    pub fn load_tree(&mut self, mut tree: Tree) {
        tree.set_line_index_increment(self.config.line_index_increment());
        tree.set_decimal_format(self.config.decimal_format());
        self.tree = tree;
        self.undo.clear();
        self.undo.mark_saved();
        tracing::debug!(empty = self.tree.is_empty(), "tree loaded");
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn palette(&self) -> &PieChartPalette {
        &self.palette
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo
    }

    /// Sets one setting by dotted path and applies it to the tree and the undo history.
    ///
    /// The document is left unchanged if the new settings are invalid.
    pub fn set_config_value(&mut self, dotted_path: &str, value: Value) -> Result<()> {
        let mut config = self.config.clone();
        config.set_value(dotted_path, value);
        let palette = config.pie_chart_palette()?;
        self.tree
            .set_line_index_increment(config.line_index_increment());
        self.tree.set_decimal_format(config.decimal_format());
        self.undo.set_limit(config.undo_limit());
        self.palette = palette;
        self.config = config;
        Ok(())
    }

    /// Performs `edit` and records it. Returns the warning text of the edit, if any.
    pub fn execute(&mut self, edit: impl DocumentEdit + 'static) -> Result<Option<String>> {
        Ok(self.undo.execute(&mut self.tree, Box::new(edit))?)
    }

    /// Constructs an edit against the current tree and executes it.
    pub fn apply<E, F>(&mut self, build: F) -> Result<Option<String>>
    where
        E: DocumentEdit + 'static,
        F: FnOnce(&Tree) -> treedoc_edit::Result<E>,
    {
        let edit = build(&self.tree)?;
        self.execute(edit)
    }

    pub fn undo(&mut self) -> Result<()> {
        Ok(self.undo.undo(&mut self.tree)?)
    }

    pub fn redo(&mut self) -> Result<()> {
        Ok(self.undo.redo(&mut self.tree)?)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_presentation_name(&self) -> Option<String> {
        self.undo.undo_presentation_name()
    }

    pub fn redo_presentation_name(&self) -> Option<String> {
        self.undo.redo_presentation_name()
    }

    pub fn is_modified(&self) -> bool {
        self.undo.is_modified()
    }

    pub fn mark_saved(&mut self) {
        self.undo.mark_saved();
    }
}
