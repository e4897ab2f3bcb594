use rusqlite::{params, OptionalExtension};

use super::*;
use crate::types::Opportunity;
use crate::validate::validate_opportunity;

impl SalesDb {
    // =========================================================================
    // Opportunities
    // =========================================================================

    /// Insert a new opportunity.
    pub fn insert_opportunity(&self, opportunity: &Opportunity) -> Result<(), StoreError> {
        validate_opportunity(opportunity)?;
        let blob = Self::encode_blob(opportunity)?;
        self.conn
            .execute(
                "INSERT INTO opportunities (
                    id, account_id, name, stage, probability, amount,
                    expected_close_date, created_date, data_json
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    opportunity.id,
                    opportunity.account_id,
                    opportunity.name,
                    opportunity.stage.as_str(),
                    opportunity.probability,
                    opportunity.amount,
                    opportunity.expected_close_date.to_string(),
                    opportunity.created_date.to_rfc3339(),
                    blob,
                ],
            )
            .map_err(|e| StoreError::from_insert("opportunity", &opportunity.id, e))?;
        Ok(())
    }

    /// Get an opportunity by id.
    pub fn get_opportunity(&self, id: &str) -> Result<Opportunity, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data_json FROM opportunities WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Self::decode_blob(&raw),
            None => Err(StoreError::not_found("opportunity", id)),
        }
    }

    /// Scan opportunities by scalar-column predicates, in insertion order.
    pub fn query_opportunities(
        &self,
        filter: &OpportunityFilter,
    ) -> Result<Vec<Opportunity>, StoreError> {
        let mut sql = String::from("SELECT data_json FROM opportunities");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(account_id) = &filter.account_id {
            clauses.push("account_id = ?");
            params.push(Box::new(account_id.clone()));
        }
        if let Some(stage) = filter.stage {
            clauses.push("stage = ?");
            params.push(Box::new(stage.as_str()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        self.query_blobs(&sql, params)
    }

    /// Full-row replace of the opportunity stored under `id`.
    pub fn update_opportunity(
        &self,
        id: &str,
        opportunity: &Opportunity,
    ) -> Result<(), StoreError> {
        validate_opportunity(opportunity)?;
        let blob = Self::encode_blob(opportunity)?;
        let rows = self.conn.execute(
            "UPDATE opportunities SET
                account_id = ?2, name = ?3, stage = ?4, probability = ?5,
                amount = ?6, expected_close_date = ?7, created_date = ?8,
                data_json = ?9
             WHERE id = ?1",
            params![
                id,
                opportunity.account_id,
                opportunity.name,
                opportunity.stage.as_str(),
                opportunity.probability,
                opportunity.amount,
                opportunity.expected_close_date.to_string(),
                opportunity.created_date.to_rfc3339(),
                blob,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("opportunity", id));
        }
        Ok(())
    }

    /// Delete an opportunity. A missing id is a silent no-op.
    pub fn delete_opportunity(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM opportunities WHERE id = ?1", params![id])?;
        Ok(())
    }
}
