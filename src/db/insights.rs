use rusqlite::{params, OptionalExtension};

use super::*;
use crate::types::AiInsight;
use crate::validate::validate_insight;

impl SalesDb {
    // =========================================================================
    // AI insights
    // =========================================================================

    /// Insert a generated insight. Model-produced structures go through the
    /// same validation gate as everything else before they land here.
    pub fn insert_insight(&self, insight: &AiInsight) -> Result<(), StoreError> {
        validate_insight(insight)?;
        let blob = Self::encode_blob(insight)?;
        self.conn
            .execute(
                "INSERT INTO ai_insights (
                    id, account_id, opportunity_id, insight_type, title,
                    confidence, priority, acted_upon, created_date, expires_date,
                    data_json
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    insight.id,
                    insight.account_id,
                    insight.opportunity_id,
                    insight.insight_type,
                    insight.title,
                    insight.confidence,
                    insight.priority.as_str(),
                    insight.acted_upon as i32,
                    insight.created_date.to_rfc3339(),
                    insight.expires_date.map(|d| d.to_rfc3339()),
                    blob,
                ],
            )
            .map_err(|e| StoreError::from_insert("insight", &insight.id, e))?;
        Ok(())
    }

    /// Get an insight by id.
    pub fn get_insight(&self, id: &str) -> Result<AiInsight, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data_json FROM ai_insights WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Self::decode_blob(&raw),
            None => Err(StoreError::not_found("insight", id)),
        }
    }

    /// Scan insights by scalar-column predicates, in insertion order.
    ///
    /// Stale insights (past expiry) are returned like any other row; staleness
    /// is the caller's judgment via `AiInsight::is_stale`.
    pub fn query_insights(&self, filter: &InsightFilter) -> Result<Vec<AiInsight>, StoreError> {
        let mut sql = String::from("SELECT data_json FROM ai_insights");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(account_id) = &filter.account_id {
            clauses.push("account_id = ?");
            params.push(Box::new(account_id.clone()));
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            params.push(Box::new(priority.as_str()));
        }
        if let Some(acted) = filter.acted_upon {
            clauses.push("acted_upon = ?");
            params.push(Box::new(acted as i32));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        self.query_blobs(&sql, params)
    }

    /// Full-row replace of the insight stored under `id`.
    pub fn update_insight(&self, id: &str, insight: &AiInsight) -> Result<(), StoreError> {
        validate_insight(insight)?;
        let blob = Self::encode_blob(insight)?;
        let rows = self.conn.execute(
            "UPDATE ai_insights SET
                account_id = ?2, opportunity_id = ?3, insight_type = ?4,
                title = ?5, confidence = ?6, priority = ?7, acted_upon = ?8,
                created_date = ?9, expires_date = ?10, data_json = ?11
             WHERE id = ?1",
            params![
                id,
                insight.account_id,
                insight.opportunity_id,
                insight.insight_type,
                insight.title,
                insight.confidence,
                insight.priority.as_str(),
                insight.acted_upon as i32,
                insight.created_date.to_rfc3339(),
                insight.expires_date.map(|d| d.to_rfc3339()),
                blob,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("insight", id));
        }
        Ok(())
    }

    /// Delete an insight. A missing id is a silent no-op.
    pub fn delete_insight(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM ai_insights WHERE id = ?1", params![id])?;
        Ok(())
    }
}
