//! Windowed aggregates over material curves
//!
//! Every function takes `now_ms` explicitly. Nothing here reads a clock, so a
//! render pass picks one `now` and threads it through all rows.

use crate::error::CoreError;
use crate::models::{Curve, Material, Sample};
use serde::{Deserialize, Serialize};
use std::fmt;

const MS_PER_MINUTE: i64 = 60_000;

/// Look-back horizon in minutes: `[now - minutes, now]`
///
/// Zero is representable and always yields no data. User-facing inputs go
/// through [`TimeWindow::new`], which rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindow(u32);

impl TimeWindow {
    /// Selectable presets, shortest first
    pub const PRESETS: [TimeWindow; 6] = [
        TimeWindow(30),
        TimeWindow(60),
        TimeWindow(120),
        TimeWindow(180),
        TimeWindow(360),
        TimeWindow(720),
    ];

    /// Validated window (must be positive)
    pub fn new(minutes: u32) -> Result<Self, CoreError> {
        if minutes == 0 {
            return Err(CoreError::InvalidWindow { minutes });
        }
        Ok(Self(minutes))
    }

    /// Unchecked window, zero allowed
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn millis(&self) -> i64 {
        self.0 as i64 * MS_PER_MINUTE
    }

    /// Inclusive `(start, end)` bounds for a given `now`
    pub fn bounds(&self, now_ms: i64) -> (i64, i64) {
        (now_ms - self.millis(), now_ms)
    }

    /// Menu label, e.g. `近30分钟`, `近2小时`
    pub fn label(&self) -> String {
        if self.0 >= 60 && self.0 % 60 == 0 {
            format!("近{}小时", self.0 / 60)
        } else {
            format!("近{}分钟", self.0)
        }
    }

    /// Next preset after this one (wraps around)
    pub fn next_preset(&self) -> TimeWindow {
        Self::PRESETS
            .iter()
            .copied()
            .find(|w| w.0 > self.0)
            .unwrap_or(Self::PRESETS[0])
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self(30)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

/// Samples of `curve` inside the window ending at `now_ms`
pub fn window_slice(curve: &Curve, window: TimeWindow, now_ms: i64) -> &[Sample] {
    if window.minutes() == 0 {
        return &[];
    }
    let (start, end) = window.bounds(now_ms);
    curve.in_range(start, end)
}

impl Curve {
    /// In-window samples, for mini-charts
    pub fn window(&self, window: TimeWindow, now_ms: i64) -> &[Sample] {
        window_slice(self, window, now_ms)
    }
}

/// Sum of in-window samples, `None` when the window holds no sample
pub fn windowed_sum(curve: &Curve, window: TimeWindow, now_ms: i64) -> Option<f64> {
    let slice = window_slice(curve, window, now_ms);
    if slice.is_empty() {
        return None;
    }
    Some(slice.iter().map(|s| s.value).sum())
}

/// Arithmetic mean of in-window samples, `None` when the window holds no sample
pub fn windowed_mean(curve: &Curve, window: TimeWindow, now_ms: i64) -> Option<f64> {
    let slice = window_slice(curve, window, now_ms);
    if slice.is_empty() {
        return None;
    }
    let total: f64 = slice.iter().map(|s| s.value).sum();
    Some(total / slice.len() as f64)
}

/// Spend over the last `window` minutes
pub fn recent_spend(material: &Material, window: TimeWindow, now_ms: i64) -> Option<f64> {
    windowed_sum(&material.consumption_curve, window, now_ms)
}

/// Mean ROI over the last `window` minutes
pub fn recent_roi(material: &Material, window: TimeWindow, now_ms: i64) -> Option<f64> {
    windowed_mean(&material.roi_curve, window, now_ms)
}

/// Both recent metrics of one row, evaluated against the same `now`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecentMetrics {
    pub spend: Option<f64>,
    pub roi: Option<f64>,
}

impl RecentMetrics {
    pub fn compute(material: &Material, window: TimeWindow, now_ms: i64) -> Self {
        Self {
            spend: recent_spend(material, window, now_ms),
            roi: recent_roi(material, window, now_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;
    const MIN: i64 = 60_000;

    fn material_with(consumption: Vec<(i64, f64)>, roi: Vec<(i64, f64)>) -> Material {
        Material::new("1", "视频广告 1")
            .with_curves(consumption.into_iter().collect(), roi.into_iter().collect())
    }

    #[test]
    fn test_recent_spend_sums_window_inclusive() {
        let m = material_with(
            vec![
                (NOW - 40 * MIN, 100.0),
                (NOW - 30 * MIN, 10.0), // start bound, included
                (NOW - 10 * MIN, 20.0),
                (NOW, 5.0), // end bound, included
                (NOW + MIN, 1000.0),
            ],
            vec![],
        );

        let spend = recent_spend(&m, TimeWindow::from_minutes(30), NOW);
        assert_eq!(spend, Some(35.0));
    }

    #[test]
    fn test_zero_window_is_no_data_not_zero() {
        let m = material_with(vec![(NOW, 5.0)], vec![(NOW, 1.0)]);
        let window = TimeWindow::from_minutes(0);

        assert_eq!(recent_spend(&m, window, NOW), None);
        assert_eq!(recent_roi(&m, window, NOW), None);
    }

    #[test]
    fn test_empty_window_is_no_data() {
        let m = material_with(vec![(NOW - 120 * MIN, 5.0)], vec![(NOW - 120 * MIN, 1.0)]);
        let window = TimeWindow::from_minutes(30);

        assert_eq!(recent_spend(&m, window, NOW), None);
        assert_eq!(recent_roi(&m, window, NOW), None);
    }

    #[test]
    fn test_zero_valued_samples_are_real_zero() {
        let m = material_with(vec![(NOW - MIN, 0.0)], vec![(NOW - MIN, 0.0)]);
        let window = TimeWindow::from_minutes(30);

        assert_eq!(recent_spend(&m, window, NOW), Some(0.0));
        assert_eq!(recent_roi(&m, window, NOW), Some(0.0));
    }

    #[test]
    fn test_recent_roi_is_mean_of_in_range_only() {
        let inside = vec![(NOW - 20 * MIN, 1.0), (NOW - 10 * MIN, 2.0), (NOW, 3.0)];
        let mut roi = inside.clone();
        roi.push((NOW - 90 * MIN, 50.0));
        let m = material_with(vec![], roi);

        let window = TimeWindow::from_minutes(30);
        assert_eq!(recent_roi(&m, window, NOW), Some(2.0));

        // Changing an out-of-range sample does not move the result
        let mut roi_changed = inside;
        roi_changed.push((NOW - 90 * MIN, -999.0));
        roi_changed.push((NOW + 5 * MIN, 999.0));
        let changed = material_with(vec![], roi_changed);
        assert_eq!(recent_roi(&changed, window, NOW), Some(2.0));
    }

    #[test]
    fn test_recent_metrics_share_now() {
        let m = material_with(vec![(NOW - MIN, 4.0)], vec![(NOW - MIN, 1.5)]);
        let metrics = RecentMetrics::compute(&m, TimeWindow::from_minutes(30), NOW);
        assert_eq!(metrics.spend, Some(4.0));
        assert_eq!(metrics.roi, Some(1.5));

        let later = RecentMetrics::compute(&m, TimeWindow::from_minutes(30), NOW + 31 * MIN);
        assert_eq!(later, RecentMetrics::default());
    }

    #[test]
    fn test_window_validation_and_labels() {
        assert!(TimeWindow::new(0).is_err());
        assert_eq!(TimeWindow::new(30).unwrap().label(), "近30分钟");
        assert_eq!(TimeWindow::new(60).unwrap().label(), "近1小时");
        assert_eq!(TimeWindow::new(720).unwrap().label(), "近12小时");
        assert_eq!(TimeWindow::new(45).unwrap().label(), "近45分钟");
    }

    #[test]
    fn test_next_preset_wraps() {
        assert_eq!(TimeWindow::from_minutes(30).next_preset().minutes(), 60);
        assert_eq!(TimeWindow::from_minutes(360).next_preset().minutes(), 720);
        assert_eq!(TimeWindow::from_minutes(720).next_preset().minutes(), 30);
        assert_eq!(TimeWindow::from_minutes(45).next_preset().minutes(), 60);
    }
}
