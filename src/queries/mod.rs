//! Read-side aggregation over the store.
//!
//! Everything in here computes derived views — regional rollups, executive
//! KPIs, trend series — without mutating anything. Each call is an independent
//! snapshot: two calls in sequence may disagree if the store was written in
//! between, and no isolation is promised across calls. Aggregations scan whole
//! tables, which is fine at demo scale (hundreds of rows) and a known scaling
//! boundary beyond it.

pub mod dashboard;
pub mod heatmap;

pub use dashboard::{dashboard_summary, DashboardParams, DashboardSummary, TrendPeriod, TrendPoint};
pub use heatmap::{regional_summary, Coordinates, HeatmapRow};

/// Churn-risk score above which an account counts as high-risk.
pub const DEFAULT_CHURN_RISK_THRESHOLD: f64 = 70.0;
