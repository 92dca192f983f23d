//! adboard-core - Core library for adboard
//!
//! Materials model, windowed curve metrics, filter engine, table view state,
//! column customizer, data source, store and event bus for the video ad
//! materials dashboard.

pub mod analytics;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod format;
pub mod models;
pub mod preview;
pub mod source;
pub mod store;
pub mod table;

pub use analytics::{
    AboveAverageFilter, FieldSelection, Overview, OverviewMetric, RecentMetrics, TimeWindow,
};
pub use config::DashboardConfig;
pub use error::{CoreError, LoadState};
pub use event::{DataEvent, EventBus};
pub use filter::{FilterCriteria, FilterInputs};
pub use models::{ChannelMetrics, Curve, Material, Sample};
pub use preview::{HoverDebouncer, PreviewIntent, PreviewState};
pub use source::{DashboardData, DateRange, MetricSource, MockSource};
pub use store::{DashboardStore, LoadOutcome};
pub use table::{
    ColumnCustomizer, ColumnId, PageSize, SortDirection, SortState, TableSnapshot, TableViewState,
};
