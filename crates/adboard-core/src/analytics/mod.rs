//! Derived metrics for the dashboard
//!
//! `window` computes per-material aggregates over a trailing time window;
//! `overview` holds page-level series, stats cards and the above-average
//! material filter.

pub mod overview;
pub mod window;

pub use overview::{
    AboveAverageFilter, FieldSelection, Overview, OverviewMetric, SeriesPoint, StatsCard,
    ValueKind,
};
pub use window::{
    recent_roi, recent_spend, window_slice, windowed_mean, windowed_sum, RecentMetrics,
    TimeWindow,
};
