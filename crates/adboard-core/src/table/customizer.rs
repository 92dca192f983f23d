//! Column customizer: search, show/hide and reorder columns
//!
//! Edits go straight into the [`TableViewState`]; there is no draft copy and
//! closing the customizer discards nothing. Only the search text is local.

use super::columns::ColumnId;
use super::reorder::splice;
use super::state::TableViewState;
use crate::analytics::window::TimeWindow;
use crate::error::CoreError;
use tracing::debug;

/// One row of the "可添加的指标" list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomizerEntry {
    pub column: ColumnId,
    pub label: String,
    pub visible: bool,
}

/// Session-scoped column editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCustomizer {
    search: String,
}

impl ColumnCustomizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn push_search(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search(&mut self) {
        self.search.pop();
    }

    /// Non-pinned columns whose label contains the search text (case-insensitive)
    pub fn entries(&self, state: &TableViewState, window: TimeWindow) -> Vec<CustomizerEntry> {
        let needle = self.search.trim().to_lowercase();
        state
            .column_order()
            .iter()
            .copied()
            .filter(|c| !c.is_pinned())
            .map(|column| CustomizerEntry {
                column,
                label: column.label(window),
                visible: state.is_visible(column),
            })
            .filter(|entry| needle.is_empty() || entry.label.to_lowercase().contains(&needle))
            .collect()
    }

    /// Visible non-pinned columns in display order ("已选择的指标")
    pub fn selected(state: &TableViewState) -> Vec<ColumnId> {
        state
            .visible_columns()
            .into_iter()
            .filter(|c| !c.is_pinned())
            .collect()
    }

    pub fn set_visible(
        state: &mut TableViewState,
        column: ColumnId,
        visible: bool,
    ) -> Result<(), CoreError> {
        state.set_visible(column, visible)
    }

    /// Reorder within the selected list
    ///
    /// The full order becomes pinned ids, the reordered selection, then the
    /// hidden columns in their prior relative order.
    pub fn move_selected(
        state: &mut TableViewState,
        from: usize,
        to: usize,
    ) -> Result<(), CoreError> {
        let reordered = splice(&Self::selected(state), from, to)?;
        state.apply_selection_order(&reordered);
        debug!(from, to, "Selected columns reordered");
        Ok(())
    }

    /// Hide every non-pinned column ("清空")
    pub fn reset(state: &mut TableViewState) {
        let hideable: Vec<ColumnId> = ColumnId::all()
            .iter()
            .copied()
            .filter(|c| !c.is_pinned())
            .collect();
        for column in hideable {
            // Non-pinned, cannot fail
            let _ = state.set_visible(column, false);
        }
    }

    /// Remove one column from the selection
    pub fn remove(state: &mut TableViewState, column: ColumnId) -> Result<(), CoreError> {
        state.set_visible(column, false)
    }
}
