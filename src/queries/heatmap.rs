//! Regional rollups for the geographic dashboard view.

use rusqlite::params;
use serde::Serialize;

use crate::db::{SalesDb, StoreError};

/// Map-pin position for a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One region's aggregated rollup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRow {
    pub region: String,
    pub account_count: i64,
    pub total_revenue: f64,
    pub avg_health_score: f64,
    /// Accounts whose churn_risk_score exceeds the caller's threshold.
    pub churn_risk_accounts: i64,
    /// Composite score: `(avg_health / 100) · (1 − churn_share) · revenue_millions`
    /// where `churn_share` is the fraction of accounts over the churn threshold.
    /// Health and revenue push the score up; a region full of at-risk accounts
    /// is pulled back toward zero.
    pub growth_opportunity_score: f64,
    pub coordinates: Coordinates,
}

/// Fixed pin positions for the demo's North-America regions. Anything
/// unrecognized lands on the continental centroid.
fn region_coordinates(region: &str) -> Coordinates {
    match region {
        "North America - East" => Coordinates { lat: 40.7128, lng: -74.0060 },
        "North America - Central" => Coordinates { lat: 41.8781, lng: -87.6298 },
        "North America - West" => Coordinates { lat: 34.0522, lng: -118.2437 },
        "North America - Southeast" => Coordinates { lat: 33.4484, lng: -84.3917 },
        "North America - Southwest" => Coordinates { lat: 32.7767, lng: -96.7970 },
        "North America - Northwest" => Coordinates { lat: 47.6062, lng: -122.3321 },
        _ => Coordinates { lat: 39.8283, lng: -98.5795 },
    }
}

/// Group accounts by region and roll each group up into a `HeatmapRow`.
///
/// Regions come back in name order. Read-only snapshot of current store state.
pub fn regional_summary(
    db: &SalesDb,
    churn_risk_threshold: f64,
) -> Result<Vec<HeatmapRow>, StoreError> {
    let conn = db.conn_ref();
    let mut stmt = conn.prepare(
        "SELECT region,
                COUNT(*),
                COALESCE(SUM(annual_revenue), 0.0),
                COALESCE(AVG(health_score), 0.0),
                SUM(CASE WHEN churn_risk_score > ?1 THEN 1 ELSE 0 END)
         FROM accounts
         GROUP BY region
         ORDER BY region",
    )?;

    let rows = stmt.query_map(params![churn_risk_threshold], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut summary = Vec::new();
    for row in rows {
        let (region, account_count, total_revenue, avg_health_score, churn_risk_accounts) = row?;
        let churn_share = if account_count > 0 {
            churn_risk_accounts as f64 / account_count as f64
        } else {
            0.0
        };
        let growth_opportunity_score =
            (avg_health_score / 100.0) * (1.0 - churn_share) * (total_revenue / 1_000_000.0);
        let coordinates = region_coordinates(&region);
        summary.push(HeatmapRow {
            region,
            account_count,
            total_revenue,
            avg_health_score,
            churn_risk_accounts,
            growth_opportunity_score,
            coordinates,
        });
    }
    Ok(summary)
}
