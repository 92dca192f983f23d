//! Read-only presentation snapshot of the materials table
//!
//! Built by [`TableViewState::snapshot`]: filter, evaluate recent metrics once
//! per row, sort, clamp the page, paginate. Renderers only read the result.

use super::columns::{ColumnId, ColumnKind};
use super::pagination::{page_bounds, PaginationSummary};
use super::sort::{sort_rows, SortDirection};
use super::state::TableViewState;
use crate::analytics::window::{RecentMetrics, TimeWindow};
use crate::filter::FilterCriteria;
use crate::format::{self, NO_DATA};
use crate::models::{Material, Sample};
use serde::Serialize;
use std::fmt;

/// Width of curve mini-charts in text renderings
const SPARKLINE_CELLS: usize = 24;

/// Typed cell value; formatting happens at render time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum CellValue {
    Text(String),
    Count(f64),
    Currency(f64),
    Percent(f64),
    Decimal(f64),
    /// In-window samples for a mini-chart
    Curve(Vec<Sample>),
    Preview { video_url: String },
    Actions { material_id: String },
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    fn numeric(kind: ColumnKind, value: Option<f64>) -> Self {
        match (kind, value) {
            (_, None) => CellValue::Missing,
            (ColumnKind::Count, Some(v)) => CellValue::Count(v),
            (ColumnKind::Currency, Some(v)) => CellValue::Currency(v),
            (ColumnKind::Percent, Some(v)) => CellValue::Percent(v),
            (_, Some(v)) => CellValue::Decimal(v),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Count(v) => f.write_str(&format::format_number(*v, 0)),
            CellValue::Currency(v) => f.write_str(&format::format_currency(Some(*v))),
            CellValue::Percent(v) => f.write_str(&format::format_percentage(Some(*v))),
            CellValue::Decimal(v) => f.write_str(&format::format_number(*v, 2)),
            CellValue::Curve(samples) => {
                let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
                f.write_str(&format::sparkline(&values, SPARKLINE_CELLS))
            }
            CellValue::Preview { .. } => f.write_str("▶"),
            CellValue::Actions { .. } => f.write_str("⋯"),
            CellValue::Missing => f.write_str(NO_DATA),
        }
    }
}

/// Header of one visible column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleColumn {
    pub id: ColumnId,
    pub label: String,
    pub width: u16,
    pub sortable: bool,
    pub sort: Option<SortDirection>,
}

impl VisibleColumn {
    /// Label with the active sort indicator, if any
    pub fn header(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.label, direction.indicator()),
            None => self.label.clone(),
        }
    }
}

/// One rendered row; `cells` line up with [`TableSnapshot::columns`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: String,
    pub name: String,
    pub video_url: String,
    pub cells: Vec<CellValue>,
}

/// Everything a renderer needs for one frame of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub window: TimeWindow,
    pub now_ms: i64,
    pub columns: Vec<VisibleColumn>,
    pub rows: Vec<RowView>,
    pub pagination: PaginationSummary,
}

impl TableSnapshot {
    /// True when the filtered result is empty ("no results" row)
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column)
    }
}

fn cell(
    column: ColumnId,
    material: &Material,
    recent: &RecentMetrics,
    window: TimeWindow,
    now_ms: i64,
) -> CellValue {
    match column {
        ColumnId::Preview => CellValue::Preview {
            video_url: material.video_url.clone(),
        },
        ColumnId::Actions => CellValue::Actions {
            material_id: material.id.clone(),
        },
        ColumnId::Name => CellValue::Text(material.name.clone()),
        ColumnId::ToolEffectiveness => match material.tool_effectiveness.as_deref() {
            Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
            _ => CellValue::Missing,
        },
        ColumnId::ConsumptionCurve => {
            CellValue::Curve(material.consumption_curve.window(window, now_ms).to_vec())
        }
        ColumnId::RoiCurve => CellValue::Curve(material.roi_curve.window(window, now_ms).to_vec()),
        other => CellValue::numeric(other.kind(), other.numeric_value(material, recent)),
    }
}

impl TableViewState {
    /// Derive the current page for rendering
    ///
    /// Takes `&mut self` because the page index is re-clamped against the
    /// filtered row count. All other state is left untouched.
    pub fn snapshot(
        &mut self,
        materials: &[Material],
        criteria: &FilterCriteria,
        window: TimeWindow,
        now_ms: i64,
    ) -> TableSnapshot {
        let mut rows: Vec<(&Material, RecentMetrics)> = materials
            .iter()
            .map(|m| (m, RecentMetrics::compute(m, window, now_ms)))
            .filter(|(m, recent)| criteria.matches_with(m, recent))
            .collect();

        sort_rows(&mut rows, self.sort());

        let total_rows = rows.len();
        self.clamp_to(total_rows);
        let (start, end) = page_bounds(self.page_index(), total_rows, self.page_size());

        let visible = self.visible_columns();
        let sort = self.sort();
        let columns = visible
            .iter()
            .map(|id| VisibleColumn {
                id: *id,
                label: id.label(window),
                width: self.width(*id),
                sortable: id.is_sortable(),
                sort: sort.filter(|s| s.column == *id).map(|s| s.direction),
            })
            .collect();

        let page_rows = rows[start..end]
            .iter()
            .map(|(material, recent)| RowView {
                id: material.id.clone(),
                name: material.name.clone(),
                video_url: material.video_url.clone(),
                cells: visible
                    .iter()
                    .map(|c| cell(*c, material, recent, window, now_ms))
                    .collect(),
            })
            .collect();

        TableSnapshot {
            window,
            now_ms,
            columns,
            rows: page_rows,
            pagination: PaginationSummary::new(self.page_index(), total_rows, self.page_size()),
        }
    }
}
