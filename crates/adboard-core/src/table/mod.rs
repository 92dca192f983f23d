//! Materials table: columns, view state, customizer and render snapshot

pub mod columns;
pub mod customizer;
pub mod pagination;
pub mod reorder;
pub mod snapshot;
pub mod sort;
pub mod state;

pub use columns::{
    clamp_width, ColumnId, ColumnKind, SortKey, DEFAULT_COLUMN_WIDTH, MAX_COLUMN_WIDTH,
    MIN_COLUMN_WIDTH, PINNED_COLUMNS,
};
pub use customizer::{ColumnCustomizer, CustomizerEntry};
pub use pagination::{page_count, PageSize, PaginationSummary};
pub use snapshot::{CellValue, RowView, TableSnapshot, VisibleColumn};
pub use sort::{cycle_sort, SortDirection, SortState};
pub use state::TableViewState;
