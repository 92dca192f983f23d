//! Table view state: sort, visibility, order, widths, pagination
//!
//! One value owns every piece of per-session table UI state. Transitions are
//! plain methods with no rendering dependency, so they are unit-testable.
//! The state survives material reloads; only `page_index` is re-clamped.

use super::columns::{clamp_width, ColumnId};
use super::pagination::{self, PageSize};
use super::reorder;
use super::sort::{cycle_sort, SortState};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-session table UI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableViewState {
    sort: Option<SortState>,
    column_order: Vec<ColumnId>,
    column_visibility: BTreeMap<ColumnId, bool>,
    column_widths: BTreeMap<ColumnId, u16>,
    page_index: usize,
    page_size: PageSize,
}

impl Default for TableViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl TableViewState {
    /// Declared order, everything visible, default widths, first page
    pub fn new() -> Self {
        let all = ColumnId::all();
        Self {
            sort: None,
            column_order: all.to_vec(),
            column_visibility: all.iter().map(|c| (*c, true)).collect(),
            column_widths: all.iter().map(|c| (*c, c.default_width())).collect(),
            page_index: 0,
            page_size: PageSize::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self.page_index = 0;
        self
    }

    // ===================
    // Sorting
    // ===================

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    /// Click on a column's sort control; non-sortable columns are ignored
    pub fn toggle_sort(&mut self, column: ColumnId) -> bool {
        if !column.is_sortable() {
            debug!(%column, "Ignoring sort toggle on non-sortable column");
            return false;
        }
        self.sort = cycle_sort(self.sort, column);
        debug!(sort = ?self.sort, "Sort changed");
        true
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort.filter(|s| s.column.is_sortable());
    }

    // ===================
    // Visibility
    // ===================

    pub fn is_visible(&self, column: ColumnId) -> bool {
        column.is_pinned() || self.column_visibility.get(&column).copied().unwrap_or(true)
    }

    /// Show or hide a column; pinned columns cannot be hidden
    pub fn set_visible(&mut self, column: ColumnId, visible: bool) -> Result<(), CoreError> {
        if column.is_pinned() {
            if visible {
                return Ok(());
            }
            return Err(CoreError::PinnedColumn { column });
        }
        self.column_visibility.insert(column, visible);
        debug!(%column, visible, "Column visibility changed");
        Ok(())
    }

    /// Flip visibility; returns the new visibility
    pub fn toggle_visible(&mut self, column: ColumnId) -> Result<bool, CoreError> {
        let next = !self.is_visible(column);
        self.set_visible(column, next)?;
        Ok(next)
    }

    /// Visible columns in display order
    pub fn visible_columns(&self) -> Vec<ColumnId> {
        self.column_order
            .iter()
            .copied()
            .filter(|c| self.is_visible(*c))
            .collect()
    }

    pub fn visibility(&self) -> &BTreeMap<ColumnId, bool> {
        &self.column_visibility
    }

    // ===================
    // Order
    // ===================

    pub fn column_order(&self) -> &[ColumnId] {
        &self.column_order
    }

    /// Drag a column within the full order; pinned columns stay at 0 and 1
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), CoreError> {
        self.column_order = reorder::move_column(&self.column_order, from, to)?;
        debug!(from, to, "Column moved");
        Ok(())
    }

    /// Move a visible column by `delta` positions among visible columns
    pub fn shift_visible(&mut self, column: ColumnId, delta: isize) -> Result<(), CoreError> {
        let visible = self.visible_columns();
        let Some(pos) = visible.iter().position(|c| *c == column) else {
            return Err(CoreError::UnknownColumn {
                name: column.id().to_string(),
            });
        };
        if column.is_pinned() {
            return Err(CoreError::PinnedColumn { column });
        }
        let target_pos = (pos as isize + delta).clamp(0, visible.len() as isize - 1) as usize;
        let target = visible[target_pos];

        let from = self.position(column);
        let to = self.position(target);
        self.move_column(from, to)
    }

    /// Replace the order with one rebuilt from a reordered selection
    pub(crate) fn apply_selection_order(&mut self, selected: &[ColumnId]) {
        self.column_order = reorder::rebuild_order(&self.column_order, selected);
    }

    fn position(&self, column: ColumnId) -> usize {
        self.column_order
            .iter()
            .position(|c| *c == column)
            .unwrap_or(0)
    }

    // ===================
    // Widths
    // ===================

    pub fn width(&self, column: ColumnId) -> u16 {
        self.column_widths
            .get(&column)
            .copied()
            .unwrap_or_else(|| column.default_width())
    }

    /// Set one column's width, clamped to [50, 500]; other columns are untouched
    pub fn resize_column(&mut self, column: ColumnId, width: i32) -> u16 {
        let clamped = clamp_width(width);
        self.column_widths.insert(column, clamped);
        clamped
    }

    /// Drag-resize by a pixel delta
    pub fn resize_by(&mut self, column: ColumnId, delta: i32) -> u16 {
        let current = self.width(column) as i32;
        self.resize_column(column, current + delta)
    }

    // ===================
    // Pagination
    // ===================

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn next_page(&mut self, total_rows: usize) {
        self.page_index = pagination::next_page(self.page_index, total_rows, self.page_size);
    }

    pub fn previous_page(&mut self) {
        self.page_index = pagination::previous_page(self.page_index);
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn last_page(&mut self, total_rows: usize) {
        self.page_index = pagination::page_count(total_rows, self.page_size) - 1;
    }

    pub fn set_page_index(&mut self, page_index: usize, total_rows: usize) {
        self.page_index = pagination::clamp_page(page_index, total_rows, self.page_size);
    }

    /// Request a page before the row count is known
    ///
    /// The next [`Self::snapshot`] clamps it against the filtered rows, so an
    /// out-of-range request lands on the last page.
    pub fn jump_to_page(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    /// Change page size, keeping the index within the new page count
    pub fn set_page_size(&mut self, page_size: PageSize, total_rows: usize) {
        self.page_index =
            pagination::resize_page(self.page_index, total_rows, self.page_size, page_size);
        self.page_size = page_size;
        debug!(page_size = page_size.get(), page_index = self.page_index, "Page size changed");
    }

    /// Re-clamp after the row count changed (reload, filter change)
    pub fn clamp_to(&mut self, total_rows: usize) {
        self.page_index = pagination::clamp_page(self.page_index, total_rows, self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::columns::PINNED_COLUMNS;
    use crate::table::sort::SortDirection;

    #[test]
    fn test_defaults_cover_all_columns() {
        let state = TableViewState::new();
        assert_eq!(state.column_order().len(), ColumnId::all().len());
        assert_eq!(state.visibility().len(), ColumnId::all().len());
        assert!(state.visibility().values().all(|v| *v));
        assert_eq!(state.width(ColumnId::Preview), 100);
        assert_eq!(state.width(ColumnId::Spend), 150);
    }

    #[test]
    fn test_toggle_sort_cycles_and_ignores_unsortable() {
        let mut state = TableViewState::new();
        assert!(!state.toggle_sort(ColumnId::RoiCurve));
        assert_eq!(state.sort(), None);

        state.toggle_sort(ColumnId::Spend);
        assert_eq!(state.sort().unwrap().direction, SortDirection::Asc);
        state.toggle_sort(ColumnId::Spend);
        assert_eq!(state.sort().unwrap().direction, SortDirection::Desc);
        state.toggle_sort(ColumnId::Spend);
        assert_eq!(state.sort(), None);
    }

    #[test]
    fn test_pinned_columns_cannot_be_hidden() {
        let mut state = TableViewState::new();
        assert!(matches!(
            state.set_visible(ColumnId::Actions, false),
            Err(CoreError::PinnedColumn { .. })
        ));
        assert!(state.is_visible(ColumnId::Actions));
        assert!(state.set_visible(ColumnId::Preview, true).is_ok());
    }

    #[test]
    fn test_hide_and_toggle_columns() {
        let mut state = TableViewState::new();
        state.set_visible(ColumnId::Clicks, false).unwrap();
        assert!(!state.visible_columns().contains(&ColumnId::Clicks));
        // Hidden column stays in the order
        assert!(state.column_order().contains(&ColumnId::Clicks));

        assert!(state.toggle_visible(ColumnId::Clicks).unwrap());
        assert!(state.visible_columns().contains(&ColumnId::Clicks));
    }

    #[test]
    fn test_move_column_keeps_pinned_leading() {
        let mut state = TableViewState::new();
        state.move_column(10, 0).unwrap();
        assert_eq!(&state.column_order()[..2], &PINNED_COLUMNS);
        assert_eq!(state.column_order().len(), ColumnId::all().len());
    }

    #[test]
    fn test_shift_visible_skips_hidden() {
        let mut state = TableViewState::new();
        state.set_visible(ColumnId::RecentRoi, false).unwrap();
        // Visible: ..., Name, RecentConsumption, ConsumptionCurve, ...
        state.shift_visible(ColumnId::ConsumptionCurve, -1).unwrap();
        let visible = state.visible_columns();
        assert_eq!(visible[3], ColumnId::ConsumptionCurve);
        assert_eq!(visible[4], ColumnId::RecentConsumption);

        assert!(state.shift_visible(ColumnId::Preview, 1).is_err());
    }

    #[test]
    fn test_resize_is_independent_and_clamped() {
        let mut state = TableViewState::new();
        let before = state.clone();

        assert_eq!(state.resize_column(ColumnId::Name, 320), 320);
        assert_eq!(state.resize_by(ColumnId::Name, 1000), 500);
        assert_eq!(state.resize_by(ColumnId::Name, -1000), 50);

        for column in ColumnId::all() {
            if *column != ColumnId::Name {
                assert_eq!(state.width(*column), before.width(*column));
            }
        }
    }

    #[test]
    fn test_page_size_change_clamps_not_resets() {
        let mut state = TableViewState::new();
        let total = 45;
        state.set_page_index(3, total);
        assert_eq!(state.page_index(), 3);

        state.set_page_size(PageSize::new(20).unwrap(), total);
        assert_eq!(state.page_index(), 1);

        state.last_page(total);
        assert_eq!(state.page_index(), 2);
        state.set_page_size(PageSize::new(50).unwrap(), total);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_clamp_on_row_count_change() {
        let mut state = TableViewState::new();
        state.set_page_index(2, 30);
        state.clamp_to(12);
        assert_eq!(state.page_index(), 1);
        state.clamp_to(0);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_next_previous_bounds() {
        let mut state = TableViewState::new();
        state.previous_page();
        assert_eq!(state.page_index(), 0);
        state.next_page(25);
        state.next_page(25);
        state.next_page(25);
        assert_eq!(state.page_index(), 2);
    }
}
