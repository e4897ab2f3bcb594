//! Seed the demo dataset into a salesos database.
//!
//! Opens (or creates) the database at the configured path and writes the
//! synthetic dataset the dashboards display. Safe to re-run against a fresh
//! file; re-running against an already-seeded database will collide on
//! nothing (ids are random) and simply add another dataset on top.
//!
//! Usage: `salesos-seed` (respects `RUST_LOG` for verbosity).

use salesos::demo::{seed, SeedConfig};
use salesos::queries::{dashboard_summary, DashboardParams};
use salesos::{SalesDb, StoreConfig};

fn main() {
    env_logger::init();

    let config = StoreConfig::load();
    let db = match config.db_path.clone() {
        Some(path) => SalesDb::open_at(path),
        None => SalesDb::open(),
    };
    let db = match db {
        Ok(db) => db,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    match seed(&db, &SeedConfig::default()) {
        Ok(summary) => {
            println!(
                "Seeded {} accounts, {} contacts, {} opportunities, {} communications, {} insights",
                summary.accounts,
                summary.contacts,
                summary.opportunities,
                summary.communications,
                summary.insights
            );
        }
        Err(e) => {
            log::error!("Seeding failed: {}", e);
            std::process::exit(1);
        }
    }

    // Headline KPIs as a smoke check that the seeded data aggregates sanely
    let params = DashboardParams {
        churn_risk_threshold: config.churn_risk_threshold,
        ..Default::default()
    };
    match dashboard_summary(&db, &params) {
        Ok(kpis) => {
            println!(
                "Dashboard: {} accounts, ${:.0} total revenue, {} high-risk, win rate {:.0}%",
                kpis.total_accounts,
                kpis.total_revenue,
                kpis.high_risk_accounts,
                kpis.win_rate * 100.0
            );
        }
        Err(e) => {
            log::error!("Dashboard summary failed: {}", e);
            std::process::exit(1);
        }
    }
}
