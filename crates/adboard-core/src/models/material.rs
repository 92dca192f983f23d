//! Video ad material record

use super::curve::Curve;
use serde::{Deserialize, Serialize};

/// One ad material as returned by the metrics API
///
/// Aggregate metrics are optional: an absent value renders as `-` and fails
/// any active lower-bound filter on that field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique, stable across reloads
    pub id: String,
    pub name: String,
    pub video_url: String,
    pub impressions: u64,
    pub clicks: u64,

    #[serde(default)]
    pub ctr: Option<f64>,
    #[serde(default)]
    pub conversion_rate: Option<f64>,
    #[serde(default)]
    pub orders: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub spend: Option<f64>,
    #[serde(default)]
    pub spend_ratio: Option<f64>,
    #[serde(default)]
    pub base_spend: Option<f64>,
    #[serde(default)]
    pub order_cost: Option<f64>,
    /// Payment ROI as a ratio (1.5 = 150%)
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default)]
    pub revenue_ratio: Option<f64>,
    #[serde(default)]
    pub presale_amount: Option<f64>,
    #[serde(default)]
    pub presale_orders: Option<f64>,
    #[serde(default)]
    pub estimated_presale_amount: Option<f64>,
    #[serde(default)]
    pub coupon_amount: Option<f64>,
    #[serde(default)]
    pub tool_effectiveness: Option<String>,
    #[serde(default)]
    pub reinvestment_spend: Option<f64>,
    #[serde(default)]
    pub reinvestment_orders: Option<f64>,
    #[serde(default)]
    pub reinvestment_revenue: Option<f64>,
    #[serde(default, rename = "reinvestmentROI")]
    pub reinvestment_roi: Option<f64>,

    /// Values of the page-level overview metrics for this material
    #[serde(default)]
    pub channel: ChannelMetrics,

    /// Spend over time
    #[serde(default)]
    pub consumption_curve: Curve,
    /// ROI over time
    #[serde(default)]
    pub roi_curve: Curve,
}

/// Per-material values of the overview metrics
///
/// Compared against the overview series means by the above-average filter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMetrics {
    pub total_spend: f64,
    pub total_revenue: f64,
    #[serde(rename = "totalROI")]
    pub total_roi: f64,
    pub material_conversion_rate: f64,
    pub live_stream_revenue: f64,
    pub live_stream_spend: f64,
    #[serde(rename = "liveStreamROI")]
    pub live_stream_roi: f64,
    pub cpm: f64,
}

impl Material {
    /// Minimal material with identity fields only (all metrics absent)
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            video_url: format!("https://example.com/video{}.mp4", id),
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_spend(mut self, spend: f64) -> Self {
        self.spend = Some(spend);
        self
    }

    pub fn with_roi(mut self, roi: f64) -> Self {
        self.roi = Some(roi);
        self
    }

    pub fn with_curves(mut self, consumption: Curve, roi: Curve) -> Self {
        self.consumption_curve = consumption;
        self.roi_curve = roi;
        self
    }
}
