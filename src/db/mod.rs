//! SQLite-based store for accounts, opportunities, communications, and insights.
//!
//! The database lives at `~/.salesos/salesos.db` by default. Each of the four
//! tables carries indexed scalar columns for filtered scans plus a `data_json`
//! blob holding the full serialized entity, so filters stay on cheap columns
//! while `get` returns the entity with full fidelity.
//!
//! One `SalesDb` owns one connection and is constructed once, then passed by
//! reference into whatever needs it. Callers run in a cooperative
//! single-threaded request model: individual operations are atomic, but a
//! read-then-write sequence can interleave with another caller's writes —
//! an accepted limitation at demo scale (see DESIGN.md).

use std::path::PathBuf;

use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod types;
pub use types::*;

pub mod accounts;
pub mod communications;
pub mod insights;
pub mod opportunities;

pub struct SalesDb {
    conn: Connection,
}

impl SalesDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at `~/.salesos/salesos.db` and apply the
    /// schema. Idempotent: a second open against the same file applies nothing.
    pub fn open() -> Result<Self, StoreError> {
        let path = Self::db_path()?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Used by tests and by callers that
    /// manage their own storage location.
    pub fn open_at(path: PathBuf) -> Result<Self, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        // Foreign-key enforcement stays OFF on purpose: account deletion
        // orphans child rows instead of failing, matching the documented
        // no-cascade contract. This build of SQLite defaults the pragma ON,
        // so disable it explicitly rather than relying on the default.
        conn.execute_batch("PRAGMA foreign_keys=OFF;")?;

        crate::migrations::run_migrations(&conn).map_err(StoreError::Migration)?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.salesos/salesos.db`.
    fn db_path() -> Result<PathBuf, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::HomeDirNotFound)?;
        Ok(home.join(".salesos").join("salesos.db"))
    }

    /// Release the connection. Consumes the handle, so a double close is a
    /// compile error rather than a runtime question; plain `drop` closes too.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Storage(e))
    }

    // =========================================================================
    // Blob codec boundary
    // =========================================================================
    //
    // Every data_json read/write funnels through these two helpers. Swapping
    // the persisted representation means touching exactly this seam.

    pub(crate) fn encode_blob<T: Serialize>(entity: &T) -> Result<String, StoreError> {
        Ok(serde_json::to_string(entity)?)
    }

    pub(crate) fn decode_blob<T: DeserializeOwned>(raw: &str) -> Result<T, StoreError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Run a `SELECT data_json …` statement and decode every row.
    ///
    /// `sql` must select exactly the blob column; filters supply their WHERE
    /// clauses and bound parameters.
    pub(crate) fn query_blobs<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: Vec<Box<dyn rusqlite::ToSql>>,
    ) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params), |row| {
            row.get::<_, String>(0)
        })?;
        let mut out = Vec::new();
        for raw in rows {
            out.push(Self::decode_blob(&raw?)?);
        }
        Ok(out)
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================

#[cfg(test)]
pub mod test_utils {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::SalesDb;
    use crate::types::*;

    /// Create a temporary database for testing.
    ///
    /// We leak the `TempDir` so the directory persists for the duration of the
    /// test. Test temp dirs are cleaned up by the OS.
    pub fn test_db() -> SalesDb {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("test.db");
        std::mem::forget(dir);
        SalesDb::open_at(path).expect("Failed to open test database")
    }

    pub fn sample_account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {id}"),
            account_type: AccountType::Retailer,
            region: "West".to_string(),
            country: "USA".to_string(),
            annual_revenue: 1_200_000.0,
            employee_count: 250,
            primary_contact_id: None,
            created_date: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
            last_activity_date: Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 0).unwrap(),
            health_score: 72.5,
            churn_risk_score: 35.0,
            lifetime_value: 3_400_000.0,
            current_products: vec![ProductLine::CocaColaClassic, ProductLine::Sprite],
            freestyle_machines_count: None,
            avg_daily_pours: None,
            machine_uptime_percentage: None,
            credit_rating: "A".to_string(),
            payment_terms: "Net 30".to_string(),
            discount_tier: "Silver".to_string(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn sample_contact(id: &str, account_id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            account_id: account_id.to_string(),
            first_name: "Jordan".to_string(),
            last_name: "Reyes".to_string(),
            title: "VP Procurement".to_string(),
            email: "jordan.reyes@example.com".to_string(),
            phone: "+1-555-0140".to_string(),
            department: "Purchasing".to_string(),
            decision_maker: true,
            influence_level: 8,
            last_contact_date: None,
            preferred_communication: CommunicationType::Email,
        }
    }

    pub fn sample_opportunity(id: &str, account_id: &str) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            account_id: account_id.to_string(),
            name: format!("Deal {id}"),
            description: "Annual volume expansion".to_string(),
            stage: OpportunityStage::Proposal,
            probability: 55.0,
            amount: 250_000.0,
            expected_close_date: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            created_date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            last_modified_date: Utc.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap(),
            owner_id: "rep-001".to_string(),
            product_lines: vec![ProductLine::CocaColaZeroSugar],
            next_best_action: None,
            risk_factors: vec![],
            success_factors: vec![],
        }
    }

    pub fn sample_communication(id: &str, account_id: &str) -> Communication {
        Communication {
            id: id.to_string(),
            account_id: account_id.to_string(),
            contact_id: None,
            opportunity_id: None,
            communication_type: CommunicationType::Email,
            subject: "Q3 volume commitment".to_string(),
            content: "Following up on the revised volume tiers.".to_string(),
            date: Utc.with_ymd_and_hms(2025, 6, 25, 15, 45, 0).unwrap(),
            direction: Direction::Outbound,
            sentiment: SentimentLabel::Positive,
            sentiment_confidence: 0.82,
            key_topics: vec![],
            action_items: vec![],
        }
    }

    pub fn sample_insight(id: &str, account_id: Option<&str>) -> AiInsight {
        AiInsight {
            id: id.to_string(),
            account_id: account_id.map(|s| s.to_string()),
            opportunity_id: None,
            insight_type: "churn_risk".to_string(),
            title: "Churn risk trending up".to_string(),
            description: "Order frequency dropped two quarters in a row.".to_string(),
            confidence: 0.8,
            priority: Priority::High,
            recommended_actions: vec!["Schedule executive sync".to_string()],
            supporting_data: serde_json::json!({}),
            created_date: Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            expires_date: None,
            acted_upon: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
