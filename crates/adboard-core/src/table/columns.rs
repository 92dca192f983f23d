//! Column registry for the materials table

use crate::analytics::window::{RecentMetrics, TimeWindow};
use crate::error::CoreError;
use crate::models::Material;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum resizable column width in pixels
pub const MIN_COLUMN_WIDTH: u16 = 50;
/// Maximum resizable column width in pixels
pub const MAX_COLUMN_WIDTH: u16 = 500;
/// Width of columns without an explicit size
pub const DEFAULT_COLUMN_WIDTH: u16 = 150;

/// Every column of the materials table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ColumnId {
    Preview,
    Actions,
    Name,
    RecentConsumption,
    RecentRoi,
    ConsumptionCurve,
    RoiCurve,
    Impressions,
    Clicks,
    Ctr,
    ConversionRate,
    Orders,
    Revenue,
    Spend,
    SpendRatio,
    BaseSpend,
    OrderCost,
    Roi,
    RevenueRatio,
    PresaleAmount,
    PresaleOrders,
    EstimatedPresaleAmount,
    CouponAmount,
    ToolEffectiveness,
    ReinvestmentSpend,
    ReinvestmentOrders,
    ReinvestmentRevenue,
    ReinvestmentRoi,
}

/// How a column's cells are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Preview,
    Actions,
    Text,
    Count,
    Currency,
    Percent,
    Decimal,
    Curve,
}

/// Value a column sorts on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortKey<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

/// Columns excluded from reordering and hiding, in their fixed positions
pub const PINNED_COLUMNS: [ColumnId; 2] = [ColumnId::Preview, ColumnId::Actions];

impl ColumnId {
    /// Declared column order
    pub fn all() -> &'static [ColumnId] {
        use ColumnId::*;
        &[
            Preview,
            Actions,
            Name,
            RecentConsumption,
            RecentRoi,
            ConsumptionCurve,
            RoiCurve,
            Impressions,
            Clicks,
            Ctr,
            ConversionRate,
            Orders,
            Revenue,
            Spend,
            SpendRatio,
            BaseSpend,
            OrderCost,
            Roi,
            RevenueRatio,
            PresaleAmount,
            PresaleOrders,
            EstimatedPresaleAmount,
            CouponAmount,
            ToolEffectiveness,
            ReinvestmentSpend,
            ReinvestmentOrders,
            ReinvestmentRevenue,
            ReinvestmentRoi,
        ]
    }

    /// Stable string id
    pub fn id(&self) -> &'static str {
        use ColumnId::*;
        match self {
            Preview => "preview",
            Actions => "actions",
            Name => "name",
            RecentConsumption => "recentConsumption",
            RecentRoi => "recentROI",
            ConsumptionCurve => "consumptionCurve",
            RoiCurve => "roiCurve",
            Impressions => "impressions",
            Clicks => "clicks",
            Ctr => "ctr",
            ConversionRate => "conversionRate",
            Orders => "orders",
            Revenue => "revenue",
            Spend => "spend",
            SpendRatio => "spendRatio",
            BaseSpend => "baseSpend",
            OrderCost => "orderCost",
            Roi => "roi",
            RevenueRatio => "revenueRatio",
            PresaleAmount => "presaleAmount",
            PresaleOrders => "presaleOrders",
            EstimatedPresaleAmount => "estimatedPresaleAmount",
            CouponAmount => "couponAmount",
            ToolEffectiveness => "toolEffectiveness",
            ReinvestmentSpend => "reinvestmentSpend",
            ReinvestmentOrders => "reinvestmentOrders",
            ReinvestmentRevenue => "reinvestmentRevenue",
            ReinvestmentRoi => "reinvestmentROI",
        }
    }

    /// Header label; the recent columns name the current window
    pub fn label(&self, window: TimeWindow) -> String {
        use ColumnId::*;
        let fixed = match self {
            Preview => "预览",
            Actions => "操作",
            Name => "素材名称",
            RecentConsumption => return format!("近{}分钟消耗", window.minutes()),
            RecentRoi => return format!("近{}分钟ROI", window.minutes()),
            ConsumptionCurve => "消耗曲线",
            RoiCurve => "ROI曲线",
            Impressions => "整体展现次数",
            Clicks => "整体点击次数",
            Ctr => "整体点击率",
            ConversionRate => "整体转化率",
            Orders => "整体成交订单数",
            Revenue => "整体成交金额",
            Spend => "整体消耗",
            SpendRatio => "整体消耗占比",
            BaseSpend => "基础消耗",
            OrderCost => "整体成交订单成本",
            Roi => "整体支付ROI",
            RevenueRatio => "整体成交金额占比",
            PresaleAmount => "整体预售订单金额",
            PresaleOrders => "整体预售订单数",
            EstimatedPresaleAmount => "整体未完结预售订单预估金额",
            CouponAmount => "整体成交智能优惠券金额",
            ToolEffectiveness => "工具效果",
            ReinvestmentSpend => "追投消耗",
            ReinvestmentOrders => "追投成交订单数",
            ReinvestmentRevenue => "追投成交金额",
            ReinvestmentRoi => "追投ROI",
        };
        fixed.to_string()
    }

    pub fn kind(&self) -> ColumnKind {
        use ColumnId::*;
        match self {
            Preview => ColumnKind::Preview,
            Actions => ColumnKind::Actions,
            Name | ToolEffectiveness => ColumnKind::Text,
            ConsumptionCurve | RoiCurve => ColumnKind::Curve,
            Impressions | Clicks | Orders | PresaleOrders | ReinvestmentOrders => ColumnKind::Count,
            RecentConsumption | Revenue | Spend | BaseSpend | OrderCost | PresaleAmount
            | EstimatedPresaleAmount | CouponAmount | ReinvestmentSpend | ReinvestmentRevenue => {
                ColumnKind::Currency
            }
            Ctr | ConversionRate | SpendRatio | RevenueRatio => ColumnKind::Percent,
            RecentRoi | Roi | ReinvestmentRoi => ColumnKind::Decimal,
        }
    }

    pub fn is_pinned(&self) -> bool {
        PINNED_COLUMNS.contains(self)
    }

    pub fn is_sortable(&self) -> bool {
        !matches!(
            self.kind(),
            ColumnKind::Preview | ColumnKind::Actions | ColumnKind::Curve
        ) && *self != ColumnId::ToolEffectiveness
    }

    /// Initial width in pixels
    pub fn default_width(&self) -> u16 {
        match self {
            ColumnId::Preview => 100,
            ColumnId::Actions => 50,
            ColumnId::ConsumptionCurve | ColumnId::RoiCurve => 250,
            _ => DEFAULT_COLUMN_WIDTH,
        }
    }

    /// Numeric value of the column on a row, if it has one
    pub fn numeric_value(&self, material: &Material, recent: &RecentMetrics) -> Option<f64> {
        use ColumnId::*;
        match self {
            RecentConsumption => recent.spend,
            RecentRoi => recent.roi,
            Impressions => Some(material.impressions as f64),
            Clicks => Some(material.clicks as f64),
            Ctr => material.ctr,
            ConversionRate => material.conversion_rate,
            Orders => material.orders,
            Revenue => material.revenue,
            Spend => material.spend,
            SpendRatio => material.spend_ratio,
            BaseSpend => material.base_spend,
            OrderCost => material.order_cost,
            Roi => material.roi,
            RevenueRatio => material.revenue_ratio,
            PresaleAmount => material.presale_amount,
            PresaleOrders => material.presale_orders,
            EstimatedPresaleAmount => material.estimated_presale_amount,
            CouponAmount => material.coupon_amount,
            ReinvestmentSpend => material.reinvestment_spend,
            ReinvestmentOrders => material.reinvestment_orders,
            ReinvestmentRevenue => material.reinvestment_revenue,
            ReinvestmentRoi => material.reinvestment_roi,
            Preview | Actions | Name | ConsumptionCurve | RoiCurve | ToolEffectiveness => None,
        }
    }

    /// Sort key of a row; recent columns use the computed value
    pub fn sort_key<'a>(&self, material: &'a Material, recent: &RecentMetrics) -> SortKey<'a> {
        match self {
            ColumnId::Name => SortKey::Text(&material.name),
            ColumnId::ToolEffectiveness => {
                SortKey::Text(material.tool_effectiveness.as_deref().unwrap_or(""))
            }
            other => SortKey::Number(other.numeric_value(material, recent)),
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ColumnId {
    type Err = CoreError;

    /// Accepts the string id, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ColumnId::all()
            .iter()
            .copied()
            .find(|c| c.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownColumn {
                name: s.to_string(),
            })
    }
}

/// Clamp a requested width into the resizable range
pub fn clamp_width(width: i32) -> u16 {
    width.clamp(MIN_COLUMN_WIDTH as i32, MAX_COLUMN_WIDTH as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_is_complete_and_unique() {
        let all = ColumnId::all();
        assert_eq!(all.len(), 28);
        let ids: HashSet<&str> = all.iter().map(|c| c.id()).collect();
        assert_eq!(ids.len(), 28);
        assert_eq!(&all[..2], &PINNED_COLUMNS);
    }

    #[test]
    fn test_parse_column_ids() {
        assert_eq!("spend".parse::<ColumnId>().unwrap(), ColumnId::Spend);
        assert_eq!("recentroi".parse::<ColumnId>().unwrap(), ColumnId::RecentRoi);
        assert!(matches!(
            "bogus".parse::<ColumnId>(),
            Err(CoreError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_recent_labels_follow_window() {
        let window = TimeWindow::from_minutes(120);
        assert_eq!(ColumnId::RecentConsumption.label(window), "近120分钟消耗");
        assert_eq!(ColumnId::RecentRoi.label(window), "近120分钟ROI");
        assert_eq!(ColumnId::Spend.label(window), "整体消耗");
    }

    #[test]
    fn test_sortability() {
        assert!(ColumnId::Name.is_sortable());
        assert!(ColumnId::RecentConsumption.is_sortable());
        assert!(!ColumnId::Preview.is_sortable());
        assert!(!ColumnId::RoiCurve.is_sortable());
        assert!(!ColumnId::ToolEffectiveness.is_sortable());
    }

    #[test]
    fn test_recent_sort_key_uses_computed_value() {
        let m = Material::new("1", "a");
        let recent = RecentMetrics {
            spend: Some(42.0),
            roi: None,
        };
        assert_eq!(
            ColumnId::RecentConsumption.sort_key(&m, &recent),
            SortKey::Number(Some(42.0))
        );
        assert_eq!(ColumnId::RecentRoi.sort_key(&m, &recent), SortKey::Number(None));
    }

    #[test]
    fn test_clamp_width() {
        assert_eq!(clamp_width(10), 50);
        assert_eq!(clamp_width(200), 200);
        assert_eq!(clamp_width(9000), 500);
    }
}
