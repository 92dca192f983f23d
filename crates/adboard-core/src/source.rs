//! Dashboard data source
//!
//! [`MetricSource`] is the seam between the dashboard and whatever serves the
//! metrics. [`MockSource`] stands in for the real API: it generates materials
//! and overview series in-process after a simulated latency.

use crate::analytics::overview::{Overview, OverviewMetric, SeriesPoint};
use crate::error::CoreError;
use crate::models::{ChannelMetrics, Curve, Material};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Spacing of generated samples
pub const SAMPLE_INTERVAL_MS: i64 = 10 * 60 * 1000;
/// Samples per generated curve (24 hours at 10 minutes)
pub const CURVE_SAMPLES: usize = 144;

/// Inclusive millisecond range of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DateRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self, CoreError> {
        if start_ms > end_ms {
            return Err(CoreError::InvalidDateRange {
                start: start_ms,
                end: end_ms,
            });
        }
        Ok(Self { start_ms, end_ms })
    }

    /// `00:00:00.000` to `23:59:59.999` of a calendar day in local time
    pub fn for_day(date: NaiveDate) -> Self {
        let start = date.and_hms_milli_opt(0, 0, 0, 0).map(local_millis);
        let end = date.and_hms_milli_opt(23, 59, 59, 999).map(local_millis);
        match (start, end) {
            (Some(start_ms), Some(end_ms)) => Self { start_ms, end_ms },
            // Unreachable for valid clock times; keep a one-day span
            _ => {
                let start_ms = date
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc().timestamp_millis())
                    .unwrap_or_default();
                Self {
                    start_ms,
                    end_ms: start_ms + 86_400_000 - 1,
                }
            }
        }
    }

    /// Today's range in local time
    pub fn today() -> Self {
        Self::for_day(Local::now().date_naive())
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        (self.start_ms..=self.end_ms).contains(&timestamp_ms)
    }
}

/// Local wall-clock time to epoch millis; DST gaps fall back to UTC
fn local_millis(dt: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .map(|local| local.timestamp_millis())
        .unwrap_or_else(|| dt.and_utc().timestamp_millis())
}

/// One fetch result: overview series plus the material list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub overview: Overview,
    pub materials: Vec<Material>,
}

/// Anything that can serve dashboard data for a date range
pub trait MetricSource: Send + Sync {
    fn fetch(
        &self,
        range: DateRange,
    ) -> impl Future<Output = Result<DashboardData, CoreError>> + Send;
}

/// In-process generator standing in for the metrics API
#[derive(Debug, Clone)]
pub struct MockSource {
    material_count: usize,
    latency: Duration,
    seed: Option<u64>,
    anchor_ms: Option<i64>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            material_count: 30,
            latency: Duration::from_millis(1000),
            seed: None,
            anchor_ms: None,
        }
    }
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material_count(mut self, count: usize) -> Self {
        self.material_count = count;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Deterministic output for a given seed and range
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Timestamp the generated curves end at (defaults to the clock, capped at the range end)
    pub fn with_anchor(mut self, anchor_ms: i64) -> Self {
        self.anchor_ms = Some(anchor_ms);
        self
    }

    /// Generate data without the simulated latency
    pub fn generate(&self, range: DateRange) -> DashboardData {
        let anchor_ms = self
            .anchor_ms
            .unwrap_or_else(|| Utc::now().timestamp_millis().min(range.end_ms));
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ range.start_ms as u64),
            None => StdRng::from_entropy(),
        };

        let mut materials: Vec<Material> = (1..=self.material_count)
            .map(|i| generate_material(&mut rng, i, anchor_ms))
            .collect();
        fill_ratios(&mut materials);

        let series_end = anchor_ms.clamp(range.start_ms, range.end_ms);
        let overview = Overview {
            series: OverviewMetric::all()
                .iter()
                .map(|m| (*m, generate_series(&mut rng, *m, range.start_ms, series_end)))
                .collect(),
        };

        debug!(
            materials = materials.len(),
            start = range.start_ms,
            end = range.end_ms,
            anchor = anchor_ms,
            "Generated mock dashboard data"
        );

        DashboardData {
            overview,
            materials,
        }
    }
}

impl MetricSource for MockSource {
    fn fetch(
        &self,
        range: DateRange,
    ) -> impl Future<Output = Result<DashboardData, CoreError>> + Send {
        let latency = self.latency;
        let data = self.generate(range);
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(data)
        }
    }
}

/// Base value of each overview series; points jitter up to +10%
fn series_base(metric: OverviewMetric) -> f64 {
    match metric {
        OverviewMetric::TotalSpend => 100_000.0,
        OverviewMetric::TotalRevenue => 150_000.0,
        OverviewMetric::TotalRoi => 1.5,
        OverviewMetric::MaterialConversionRate => 0.5,
        OverviewMetric::LiveStreamRevenue => 50_000.0,
        OverviewMetric::LiveStreamSpend => 30_000.0,
        OverviewMetric::LiveStreamRoi => 1.67,
        OverviewMetric::Ctr => 0.05,
        OverviewMetric::ConversionRate => 0.02,
        OverviewMetric::Cpm => 10.0,
    }
}

fn generate_series(
    rng: &mut StdRng,
    metric: OverviewMetric,
    start_ms: i64,
    end_ms: i64,
) -> Vec<SeriesPoint> {
    let base = series_base(metric);
    let mut points = Vec::new();
    let mut timestamp = start_ms;
    while timestamp <= end_ms {
        points.push(SeriesPoint {
            timestamp,
            value: base + rng.gen::<f64>() * base * 0.1,
        });
        timestamp += SAMPLE_INTERVAL_MS;
    }
    points
}

fn generate_curve(rng: &mut StdRng, anchor_ms: i64, max_value: f64) -> Curve {
    (0..CURVE_SAMPLES)
        .map(|i| {
            let offset = (CURVE_SAMPLES - 1 - i) as i64 * SAMPLE_INTERVAL_MS;
            (anchor_ms - offset, rng.gen::<f64>() * max_value)
        })
        .collect()
}

const TOOL_EFFECTS: [&str; 4] = ["优秀", "良好", "一般", "待优化"];

fn generate_material(rng: &mut StdRng, index: usize, anchor_ms: i64) -> Material {
    let impressions = rng.gen_range(10_000..1_010_000u64);
    let clicks = rng.gen_range(1_000..51_000u64).min(impressions);
    let orders = rng.gen_range(10..2_000u32) as f64;
    let spend = rng.gen_range(1_000.0..100_000.0);
    let revenue = spend * rng.gen_range(0.3..3.5);

    let mut material = Material::new(index.to_string(), format!("视频广告 {}", index))
        .with_spend(spend)
        .with_roi(revenue / spend)
        .with_curves(
            generate_curve(rng, anchor_ms, 1000.0),
            generate_curve(rng, anchor_ms, 5.0),
        );

    material.impressions = impressions;
    material.clicks = clicks;
    material.ctr = Some(clicks as f64 / impressions as f64);
    material.conversion_rate = Some(orders / clicks as f64);
    material.orders = Some(orders);
    material.revenue = Some(revenue);
    material.base_spend = Some(spend * rng.gen_range(0.4..0.9));
    material.order_cost = Some(spend / orders);
    material.coupon_amount = Some(revenue * rng.gen_range(0.0..0.05));

    if rng.gen_bool(0.7) {
        let presale_orders = rng.gen_range(0..200u32) as f64;
        material.presale_orders = Some(presale_orders);
        material.presale_amount = Some(presale_orders * rng.gen_range(50.0..300.0));
        material.estimated_presale_amount = Some(presale_orders * rng.gen_range(20.0..120.0));
    }

    if rng.gen_bool(0.5) {
        let reinvest = spend * rng.gen_range(0.05..0.3);
        let reinvest_revenue = reinvest * rng.gen_range(0.5..3.0);
        material.reinvestment_spend = Some(reinvest);
        material.reinvestment_orders = Some(rng.gen_range(1..300u32) as f64);
        material.reinvestment_revenue = Some(reinvest_revenue);
        material.reinvestment_roi = Some(reinvest_revenue / reinvest);
    }

    if rng.gen_bool(0.6) {
        let effect = TOOL_EFFECTS[rng.gen_range(0..TOOL_EFFECTS.len())];
        material.tool_effectiveness = Some(effect.to_string());
    }

    material.channel = ChannelMetrics {
        total_spend: rng.gen::<f64>() * 100_000.0,
        total_revenue: rng.gen::<f64>() * 150_000.0,
        total_roi: rng.gen::<f64>() * 2.0 + 0.5,
        material_conversion_rate: rng.gen::<f64>() * 0.5,
        live_stream_revenue: rng.gen::<f64>() * 50_000.0,
        live_stream_spend: rng.gen::<f64>() * 30_000.0,
        live_stream_roi: rng.gen::<f64>() * 2.0 + 0.5,
        cpm: rng.gen::<f64>() * 20.0,
    };

    material
}

/// Share of total spend and revenue per material
fn fill_ratios(materials: &mut [Material]) {
    let total_spend: f64 = materials.iter().filter_map(|m| m.spend).sum();
    let total_revenue: f64 = materials.iter().filter_map(|m| m.revenue).sum();
    for material in materials.iter_mut() {
        if total_spend > 0.0 {
            material.spend_ratio = material.spend.map(|s| s / total_spend);
        }
        if total_revenue > 0.0 {
            material.revenue_ratio = material.revenue.map(|r| r / total_revenue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::window::{recent_spend, TimeWindow};

    const ANCHOR: i64 = 1_700_000_000_000;

    fn range() -> DateRange {
        DateRange::new(ANCHOR - 86_400_000 + 1, ANCHOR).unwrap()
    }

    #[test]
    fn test_date_range_validation() {
        assert!(matches!(
            DateRange::new(10, 5),
            Err(CoreError::InvalidDateRange { start: 10, end: 5 })
        ));
        assert!(DateRange::new(5, 5).is_ok());
    }

    #[test]
    fn test_for_day_spans_full_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let range = DateRange::for_day(date);
        // 24h minus one millisecond on days without a DST switch
        assert_eq!(range.end_ms - range.start_ms, 86_400_000 - 1);
        assert!(range.contains(range.start_ms));
        assert!(!range.contains(range.end_ms + 1));
    }

    #[test]
    fn test_generate_shape() {
        let data = MockSource::new()
            .with_seed(Some(7))
            .with_anchor(ANCHOR)
            .generate(range());

        assert_eq!(data.materials.len(), 30);
        assert_eq!(data.materials[4].name, "视频广告 5");
        assert_eq!(data.materials[0].video_url, "https://example.com/video1.mp4");

        let curve = &data.materials[0].consumption_curve;
        assert_eq!(curve.len(), CURVE_SAMPLES);
        assert_eq!(curve.last().unwrap().timestamp, ANCHOR);
        assert!(curve.iter().all(|s| (0.0..1000.0).contains(&s.value)));

        for metric in OverviewMetric::all() {
            let series = data.overview.series(*metric);
            assert_eq!(series.len(), CURVE_SAMPLES);
            assert!(series.iter().all(|p| range().contains(p.timestamp)));
        }
    }

    #[test]
    fn test_seed_is_deterministic() {
        let source = MockSource::new().with_seed(Some(42)).with_anchor(ANCHOR);
        assert_eq!(source.generate(range()), source.generate(range()));
    }

    #[test]
    fn test_recent_window_has_data_at_anchor() {
        let data = MockSource::new()
            .with_seed(Some(1))
            .with_anchor(ANCHOR)
            .generate(range());
        assert!(recent_spend(&data.materials[0], TimeWindow::from_minutes(30), ANCHOR).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_latency() {
        let source = MockSource::new()
            .with_seed(Some(3))
            .with_anchor(ANCHOR)
            .with_latency(Duration::from_millis(1000));

        let started = tokio::time::Instant::now();
        let data = source.fetch(range()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
        assert_eq!(data.materials.len(), 30);
    }
}
