//! Material filter engine
//!
//! A conjunction of non-strict lower bounds plus a case-sensitive name
//! substring. Absent criteria impose no constraint. Threshold text that does
//! not parse to a finite number is treated as absent, like an empty field.

use crate::analytics::window::{RecentMetrics, TimeWindow};
use crate::models::Material;
use serde::{Deserialize, Serialize};

/// Active filter criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Substring that must appear in the material name
    pub name: Option<String>,
    pub min_spend: Option<f64>,
    pub min_roi: Option<f64>,
    /// Lower bound on spend within the selected window
    pub min_recent_spend: Option<f64>,
    /// Lower bound on mean ROI within the selected window
    pub min_recent_roi: Option<f64>,
}

/// Raw text of the advanced filter inputs, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub name: String,
    pub spend: String,
    pub roi: String,
    pub recent_spend: String,
    pub recent_roi: String,
}

/// Parse a threshold input; anything but a finite number is inactive
///
/// ```
/// use adboard_core::filter::parse_threshold;
///
/// assert_eq!(parse_threshold(" 12.5 "), Some(12.5));
/// assert_eq!(parse_threshold(""), None);
/// assert_eq!(parse_threshold("abc"), None);
/// assert_eq!(parse_threshold("inf"), None);
/// ```
pub fn parse_threshold(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

impl FilterCriteria {
    /// Build criteria from raw input text
    pub fn from_inputs(inputs: &FilterInputs) -> Self {
        Self {
            name: Some(inputs.name.clone()).filter(|n| !n.is_empty()),
            min_spend: parse_threshold(&inputs.spend),
            min_roi: parse_threshold(&inputs.roi),
            min_recent_spend: parse_threshold(&inputs.recent_spend),
            min_recent_roi: parse_threshold(&inputs.recent_roi),
        }
    }

    /// True when no criterion is active
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().is_none_or(str::is_empty)
            && self.min_spend.is_none()
            && self.min_roi.is_none()
            && self.min_recent_spend.is_none()
            && self.min_recent_roi.is_none()
    }

    /// Number of active criteria (for the "高级筛选" badge)
    pub fn active_count(&self) -> usize {
        usize::from(self.name.as_deref().is_some_and(|n| !n.is_empty()))
            + usize::from(self.min_spend.is_some())
            + usize::from(self.min_roi.is_some())
            + usize::from(self.min_recent_spend.is_some())
            + usize::from(self.min_recent_roi.is_some())
    }

    fn uses_window(&self) -> bool {
        self.min_recent_spend.is_some() || self.min_recent_roi.is_some()
    }

    /// Whether a single material satisfies every active criterion
    pub fn matches(&self, material: &Material, window: TimeWindow, now_ms: i64) -> bool {
        let recent = if self.uses_window() {
            RecentMetrics::compute(material, window, now_ms)
        } else {
            RecentMetrics::default()
        };
        self.matches_with(material, &recent)
    }

    /// Same as [`matches`](Self::matches) with recent metrics already computed
    pub fn matches_with(&self, material: &Material, recent: &RecentMetrics) -> bool {
        if let Some(name) = self.name.as_deref() {
            if !name.is_empty() && !material.name.contains(name) {
                return false;
            }
        }

        at_least(material.spend, self.min_spend)
            && at_least(material.roi, self.min_roi)
            && at_least(recent.spend, self.min_recent_spend)
            && at_least(recent.roi, self.min_recent_roi)
    }
}

/// `value >= threshold`; an inactive threshold always passes, a missing value never does
fn at_least(value: Option<f64>, threshold: Option<f64>) -> bool {
    match threshold {
        None => true,
        Some(min) => value.is_some_and(|v| v >= min),
    }
}

/// Filter materials, preserving input order
///
/// Pure and idempotent: `apply(apply(l, c), c) == apply(l, c)` for the same
/// window and `now`.
pub fn apply(
    materials: &[Material],
    criteria: &FilterCriteria,
    window: TimeWindow,
    now_ms: i64,
) -> Vec<Material> {
    if criteria.is_empty() {
        return materials.to_vec();
    }

    let kept: Vec<Material> = materials
        .iter()
        .filter(|m| criteria.matches(m, window, now_ms))
        .cloned()
        .collect();

    tracing::debug!(
        total = materials.len(),
        kept = kept.len(),
        active = criteria.active_count(),
        "Filter applied"
    );

    kept
}
