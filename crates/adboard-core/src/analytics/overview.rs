//! Page-level overview metrics and the above-average material filter

use crate::analytics::window::TimeWindow;
use crate::format::{format_number, NO_DATA};
use crate::models::Material;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Overview metric shown as a stats card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverviewMetric {
    TotalSpend,
    TotalRevenue,
    #[serde(rename = "totalROI")]
    TotalRoi,
    MaterialConversionRate,
    LiveStreamRevenue,
    LiveStreamSpend,
    #[serde(rename = "liveStreamROI")]
    LiveStreamRoi,
    Ctr,
    ConversionRate,
    Cpm,
}

/// How a metric value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Percent,
    Currency,
    Decimal,
}

impl OverviewMetric {
    pub fn all() -> &'static [OverviewMetric] {
        &[
            OverviewMetric::TotalSpend,
            OverviewMetric::TotalRevenue,
            OverviewMetric::TotalRoi,
            OverviewMetric::MaterialConversionRate,
            OverviewMetric::LiveStreamRevenue,
            OverviewMetric::LiveStreamSpend,
            OverviewMetric::LiveStreamRoi,
            OverviewMetric::Ctr,
            OverviewMetric::ConversionRate,
            OverviewMetric::Cpm,
        ]
    }

    /// Stable id used in config files and CLI flags
    pub fn id(&self) -> &'static str {
        match self {
            OverviewMetric::TotalSpend => "totalSpend",
            OverviewMetric::TotalRevenue => "totalRevenue",
            OverviewMetric::TotalRoi => "totalROI",
            OverviewMetric::MaterialConversionRate => "materialConversionRate",
            OverviewMetric::LiveStreamRevenue => "liveStreamRevenue",
            OverviewMetric::LiveStreamSpend => "liveStreamSpend",
            OverviewMetric::LiveStreamRoi => "liveStreamROI",
            OverviewMetric::Ctr => "ctr",
            OverviewMetric::ConversionRate => "conversionRate",
            OverviewMetric::Cpm => "cpm",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().iter().copied().find(|m| m.id() == id)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OverviewMetric::TotalSpend => "全域素材消耗金额",
            OverviewMetric::TotalRevenue => "全域素材成交金额",
            OverviewMetric::TotalRoi => "全域素材ROI",
            OverviewMetric::MaterialConversionRate => "素材成交占比",
            OverviewMetric::LiveStreamRevenue => "直播间画面成交金额",
            OverviewMetric::LiveStreamSpend => "直播间画面消耗金额",
            OverviewMetric::LiveStreamRoi => "直播间画面ROI",
            OverviewMetric::Ctr => "点击率 (CTR)",
            OverviewMetric::ConversionRate => "转化率",
            OverviewMetric::Cpm => "千次展示费用 (CPM)",
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            OverviewMetric::Ctr
            | OverviewMetric::ConversionRate
            | OverviewMetric::MaterialConversionRate => ValueKind::Percent,
            OverviewMetric::Cpm
            | OverviewMetric::TotalSpend
            | OverviewMetric::TotalRevenue
            | OverviewMetric::LiveStreamSpend
            | OverviewMetric::LiveStreamRevenue => ValueKind::Currency,
            OverviewMetric::TotalRoi | OverviewMetric::LiveStreamRoi => ValueKind::Decimal,
        }
    }

    /// Card formatting for a value of this metric
    pub fn format_value(&self, value: f64) -> String {
        match self.kind() {
            ValueKind::Percent => format!("{}%", format_number(value * 100.0, 2)),
            ValueKind::Currency => format!("¥{}", format_number(value, 2)),
            ValueKind::Decimal => format_number(value, 2),
        }
    }

    /// This metric's value on a single material
    pub fn material_value(&self, material: &Material) -> Option<f64> {
        let ch = &material.channel;
        match self {
            OverviewMetric::TotalSpend => Some(ch.total_spend),
            OverviewMetric::TotalRevenue => Some(ch.total_revenue),
            OverviewMetric::TotalRoi => Some(ch.total_roi),
            OverviewMetric::MaterialConversionRate => Some(ch.material_conversion_rate),
            OverviewMetric::LiveStreamRevenue => Some(ch.live_stream_revenue),
            OverviewMetric::LiveStreamSpend => Some(ch.live_stream_spend),
            OverviewMetric::LiveStreamRoi => Some(ch.live_stream_roi),
            OverviewMetric::Ctr => material.ctr,
            OverviewMetric::ConversionRate => material.conversion_rate,
            OverviewMetric::Cpm => Some(ch.cpm),
        }
    }
}

/// One point of an overview series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    pub value: f64,
}

/// Overview series for the selected day, keyed by metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub series: BTreeMap<OverviewMetric, Vec<SeriesPoint>>,
}

impl Overview {
    pub fn series(&self, metric: OverviewMetric) -> &[SeriesPoint] {
        self.series.get(&metric).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last value of the series (card headline)
    pub fn latest(&self, metric: OverviewMetric) -> Option<f64> {
        self.series(metric).last().map(|p| p.value)
    }

    /// Mean over the whole series
    pub fn mean(&self, metric: OverviewMetric) -> Option<f64> {
        let points = self.series(metric);
        if points.is_empty() {
            return None;
        }
        Some(points.iter().map(|p| p.value).sum::<f64>() / points.len() as f64)
    }

    /// Points with `timestamp >= now - window` (card chart)
    pub fn windowed(&self, metric: OverviewMetric, window: TimeWindow, now_ms: i64) -> &[SeriesPoint] {
        let points = self.series(metric);
        let (start, _) = window.bounds(now_ms);
        let lo = points.partition_point(|p| p.timestamp < start);
        &points[lo..]
    }

    /// Formatted headline value, `-` when the series is empty
    pub fn headline(&self, metric: OverviewMetric) -> String {
        self.latest(metric)
            .map(|v| metric.format_value(v))
            .unwrap_or_else(|| NO_DATA.to_string())
    }

    /// Build a card model per selected metric, in declaration order
    pub fn cards(
        &self,
        selection: &FieldSelection,
        window: TimeWindow,
        now_ms: i64,
    ) -> Vec<StatsCard> {
        OverviewMetric::all()
            .iter()
            .copied()
            .filter(|m| selection.is_selected(*m))
            .map(|metric| StatsCard {
                metric,
                title: metric.label(),
                value: self.headline(metric),
                points: self.windowed(metric, window, now_ms).to_vec(),
            })
            .collect()
    }
}

/// Presentation model of one stats card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsCard {
    pub metric: OverviewMetric,
    pub title: &'static str,
    pub value: String,
    pub points: Vec<SeriesPoint>,
}

/// Which overview cards are displayed (all by default)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    selected: BTreeSet<OverviewMetric>,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self {
            selected: OverviewMetric::all().iter().copied().collect(),
        }
    }
}

impl FieldSelection {
    pub fn is_selected(&self, metric: OverviewMetric) -> bool {
        self.selected.contains(&metric)
    }

    pub fn set(&mut self, metric: OverviewMetric, selected: bool) {
        if selected {
            self.selected.insert(metric);
        } else {
            self.selected.remove(&metric);
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Overview metrics toggled on as "at or above average" filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AboveAverageFilter {
    active: BTreeSet<OverviewMetric>,
}

impl AboveAverageFilter {
    /// Toggle a metric; returns whether it is now active
    pub fn toggle(&mut self, metric: OverviewMetric) -> bool {
        if !self.active.remove(&metric) {
            self.active.insert(metric);
            true
        } else {
            false
        }
    }

    pub fn is_active(&self, metric: OverviewMetric) -> bool {
        self.active.contains(&metric)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = OverviewMetric> + '_ {
        self.active.iter().copied()
    }

    /// Keep materials whose value is `>=` the series mean for every active metric
    ///
    /// Order-preserving. A metric with an empty series imposes no constraint;
    /// a material missing the value fails it.
    pub fn apply(&self, materials: &[Material], overview: &Overview) -> Vec<Material> {
        if self.active.is_empty() {
            return materials.to_vec();
        }

        let thresholds: Vec<(OverviewMetric, f64)> = self
            .active
            .iter()
            .filter_map(|m| overview.mean(*m).map(|avg| (*m, avg)))
            .collect();

        materials
            .iter()
            .filter(|material| {
                thresholds.iter().all(|(metric, avg)| {
                    metric
                        .material_value(material)
                        .is_some_and(|value| value >= *avg)
                })
            })
            .cloned()
            .collect()
    }
}
