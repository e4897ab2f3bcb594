//! Executive dashboard summary: KPIs, win rate, and trend series.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::{SalesDb, StoreError};
use crate::queries::DEFAULT_CHURN_RISK_THRESHOLD;
use crate::types::OpportunityStage;

/// Bucket width for the trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Day,
    Week,
    Month,
}

impl TrendPeriod {
    /// SQLite strftime pattern producing the bucket label.
    fn strftime_pattern(&self) -> &'static str {
        match self {
            TrendPeriod::Day => "%Y-%m-%d",
            TrendPeriod::Week => "%Y-W%W",
            TrendPeriod::Month => "%Y-%m",
        }
    }
}

/// One bucket of a trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
}

/// Knobs for the summary computation. `now` anchors "closing this month";
/// callers outside tests just take the default.
#[derive(Debug, Clone)]
pub struct DashboardParams {
    pub churn_risk_threshold: f64,
    pub trend_period: TrendPeriod,
    pub now: DateTime<Utc>,
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            churn_risk_threshold: DEFAULT_CHURN_RISK_THRESHOLD,
            trend_period: TrendPeriod::Month,
            now: Utc::now(),
        }
    }
}

/// Executive dashboard summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_accounts: i64,
    pub total_revenue: f64,
    pub high_risk_accounts: i64,
    /// Lifetime value tied up in high-risk accounts.
    pub at_risk_revenue: f64,
    pub opportunities_closing_this_month: i64,
    pub avg_deal_size: f64,
    /// closed_won / (closed_won + closed_lost) across all history, as a
    /// fraction in [0, 1]. Zero when nothing has closed yet.
    pub win_rate: f64,
    /// Top three regions by total account revenue, best first.
    pub top_performing_regions: Vec<String>,
    pub revenue_trend: Vec<TrendPoint>,
    pub health_score_trend: Vec<TrendPoint>,
    pub churn_risk_trend: Vec<TrendPoint>,
}

/// Compute the executive dashboard summary as a read-only snapshot.
pub fn dashboard_summary(
    db: &SalesDb,
    params: &DashboardParams,
) -> Result<DashboardSummary, StoreError> {
    let conn = db.conn_ref();

    let (total_accounts, total_revenue): (i64, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(annual_revenue), 0.0) FROM accounts",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (high_risk_accounts, at_risk_revenue): (i64, f64) = conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(lifetime_value), 0.0)
         FROM accounts WHERE churn_risk_score > ?1",
        params![params.churn_risk_threshold],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (month_start, next_month_start) = current_month_bounds(params.now);
    let opportunities_closing_this_month: i64 = conn.query_row(
        "SELECT COUNT(*) FROM opportunities
         WHERE expected_close_date >= ?1 AND expected_close_date < ?2",
        params![month_start.to_string(), next_month_start.to_string()],
        |row| row.get(0),
    )?;

    let avg_deal_size: f64 = conn.query_row(
        "SELECT COALESCE(AVG(amount), 0.0) FROM opportunities",
        [],
        |row| row.get(0),
    )?;

    let won: i64 = conn.query_row(
        "SELECT COUNT(*) FROM opportunities WHERE stage = ?1",
        params![OpportunityStage::ClosedWon.as_str()],
        |row| row.get(0),
    )?;
    let lost: i64 = conn.query_row(
        "SELECT COUNT(*) FROM opportunities WHERE stage = ?1",
        params![OpportunityStage::ClosedLost.as_str()],
        |row| row.get(0),
    )?;
    let win_rate = if won + lost > 0 {
        won as f64 / (won + lost) as f64
    } else {
        0.0
    };

    let mut stmt = conn.prepare(
        "SELECT region FROM accounts
         GROUP BY region
         ORDER BY SUM(annual_revenue) DESC
         LIMIT 3",
    )?;
    let top_performing_regions = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let (revenue_trend, health_score_trend, churn_risk_trend) =
        activity_trends(db, params.trend_period)?;

    Ok(DashboardSummary {
        total_accounts,
        total_revenue,
        high_risk_accounts,
        at_risk_revenue,
        opportunities_closing_this_month,
        avg_deal_size,
        win_rate,
        top_performing_regions,
        revenue_trend,
        health_score_trend,
        churn_risk_trend,
    })
}

/// First day of `now`'s month and first day of the following month.
fn current_month_bounds(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    let next_month_start = if today.month() == 12 {
        NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(today.year(), today.month() + 1, 1)
    }
    .unwrap_or(month_start);
    (month_start, next_month_start)
}

/// Bucket accounts by last-activity date and aggregate the three tracked
/// signals per bucket: revenue sum, mean health, mean churn risk.
fn activity_trends(
    db: &SalesDb,
    period: TrendPeriod,
) -> Result<(Vec<TrendPoint>, Vec<TrendPoint>, Vec<TrendPoint>), StoreError> {
    let mut stmt = db.conn_ref().prepare(
        "SELECT strftime(?1, last_activity_date) AS bucket,
                COALESCE(SUM(annual_revenue), 0.0),
                COALESCE(AVG(health_score), 0.0),
                COALESCE(AVG(churn_risk_score), 0.0)
         FROM accounts
         GROUP BY bucket
         ORDER BY bucket",
    )?;

    let rows = stmt.query_map(params![period.strftime_pattern()], |row| {
        Ok((
            row.get::<_, Option<String>>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, f64>(3)?,
        ))
    })?;

    let mut revenue = Vec::new();
    let mut health = Vec::new();
    let mut churn = Vec::new();
    for row in rows {
        let (bucket, revenue_sum, health_avg, churn_avg) = row?;
        // An unparsable timestamp yields a NULL bucket; skip rather than fail
        let Some(bucket) = bucket else { continue };
        revenue.push(TrendPoint { period: bucket.clone(), value: revenue_sum });
        health.push(TrendPoint { period: bucket.clone(), value: health_avg });
        churn.push(TrendPoint { period: bucket, value: churn_avg });
    }
    Ok((revenue, health, churn))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::test_utils::{sample_account, sample_opportunity, test_db};

    fn fixed_params() -> DashboardParams {
        DashboardParams {
            churn_risk_threshold: DEFAULT_CHURN_RISK_THRESHOLD,
            trend_period: TrendPeriod::Month,
            now: Utc.with_ymd_and_hms(2025, 8, 7, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_win_rate_counts_only_closed_deals() {
        let db = test_db();
        for i in 0..3 {
            let mut won = sample_opportunity(&format!("opp-won-{i}"), "acc-1");
            won.stage = OpportunityStage::ClosedWon;
            db.insert_opportunity(&won).expect("insert");
        }
        let mut lost = sample_opportunity("opp-lost", "acc-1");
        lost.stage = OpportunityStage::ClosedLost;
        db.insert_opportunity(&lost).expect("insert");
        // Open deals must not dilute the rate
        for i in 0..4 {
            db.insert_opportunity(&sample_opportunity(&format!("opp-open-{i}"), "acc-1"))
                .expect("insert");
        }

        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert!((summary.win_rate - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_win_rate_zero_when_nothing_closed() {
        let db = test_db();
        db.insert_opportunity(&sample_opportunity("opp-open", "acc-1"))
            .expect("insert");
        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert_eq!(summary.win_rate, 0.0);
    }

    #[test]
    fn test_closing_this_month_window() {
        let db = test_db();
        let params = fixed_params(); // anchored to 2025-08-07

        let mut in_month = sample_opportunity("opp-aug", "acc-1");
        in_month.expected_close_date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        db.insert_opportunity(&in_month).expect("insert");

        let mut first_of_month = sample_opportunity("opp-aug1", "acc-1");
        first_of_month.expected_close_date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        db.insert_opportunity(&first_of_month).expect("insert");

        let mut next_month = sample_opportunity("opp-sep", "acc-1");
        next_month.expected_close_date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        db.insert_opportunity(&next_month).expect("insert");

        let mut past = sample_opportunity("opp-jul", "acc-1");
        past.expected_close_date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        db.insert_opportunity(&past).expect("insert");

        let summary = dashboard_summary(&db, &params).expect("summary");
        assert_eq!(summary.opportunities_closing_this_month, 2);
    }

    #[test]
    fn test_high_risk_and_at_risk_revenue() {
        let db = test_db();
        let mut risky = sample_account("acc-risky");
        risky.churn_risk_score = 85.0;
        risky.lifetime_value = 2_000_000.0;
        db.insert_account(&risky).expect("insert");

        let mut safe = sample_account("acc-safe");
        safe.churn_risk_score = 20.0;
        safe.lifetime_value = 9_000_000.0;
        db.insert_account(&safe).expect("insert");

        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert_eq!(summary.total_accounts, 2);
        assert_eq!(summary.high_risk_accounts, 1);
        assert!((summary.at_risk_revenue - 2_000_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_deal_size_is_mean_over_all_opportunities() {
        let db = test_db();
        for (id, amount) in [("opp-1", 100_000.0), ("opp-2", 300_000.0)] {
            let mut opp = sample_opportunity(id, "acc-1");
            opp.amount = amount;
            db.insert_opportunity(&opp).expect("insert");
        }

        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert!((summary.avg_deal_size - 200_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_regions_ranked_by_revenue() {
        let db = test_db();
        let regions = [
            ("acc-1", "West", 500_000.0),
            ("acc-2", "East", 2_000_000.0),
            ("acc-3", "Central", 1_000_000.0),
            ("acc-4", "Southeast", 100_000.0),
        ];
        for (id, region, revenue) in regions {
            let mut account = sample_account(id);
            account.region = region.to_string();
            account.annual_revenue = revenue;
            db.insert_account(&account).expect("insert");
        }

        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert_eq!(summary.top_performing_regions, vec!["East", "Central", "West"]);
    }

    #[test]
    fn test_monthly_trend_buckets() {
        let db = test_db();
        let activity = [
            ("acc-1", 2025, 5, 400_000.0, 80.0, 10.0),
            ("acc-2", 2025, 5, 600_000.0, 60.0, 30.0),
            ("acc-3", 2025, 6, 250_000.0, 50.0, 70.0),
        ];
        for (id, year, month, revenue, health, churn) in activity {
            let mut account = sample_account(id);
            account.last_activity_date = Utc.with_ymd_and_hms(year, month, 10, 9, 0, 0).unwrap();
            account.annual_revenue = revenue;
            account.health_score = health;
            account.churn_risk_score = churn;
            db.insert_account(&account).expect("insert");
        }

        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert_eq!(summary.revenue_trend.len(), 2);
        assert_eq!(summary.revenue_trend[0].period, "2025-05");
        assert!((summary.revenue_trend[0].value - 1_000_000.0).abs() < 1e-9);
        assert!((summary.health_score_trend[0].value - 70.0).abs() < 1e-9);
        assert_eq!(summary.churn_risk_trend[1].period, "2025-06");
        assert!((summary.churn_risk_trend[1].value - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_trend_buckets() {
        let db = test_db();
        let mut account = sample_account("acc-1");
        account.last_activity_date = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap();
        db.insert_account(&account).expect("insert");

        let mut params = fixed_params();
        params.trend_period = TrendPeriod::Day;
        let summary = dashboard_summary(&db, &params).expect("summary");
        assert_eq!(summary.revenue_trend[0].period, "2025-07-01");
    }

    #[test]
    fn test_december_month_bounds_roll_over() {
        let now = Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap();
        let (start, end) = current_month_bounds(now);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_empty_store_summary_is_all_zeroes() {
        let db = test_db();
        let summary = dashboard_summary(&db, &fixed_params()).expect("summary");
        assert_eq!(summary.total_accounts, 0);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.win_rate, 0.0);
        assert!(summary.top_performing_regions.is_empty());
        assert!(summary.revenue_trend.is_empty());
    }
}
