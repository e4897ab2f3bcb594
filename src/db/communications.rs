use rusqlite::{params, OptionalExtension};

use super::*;
use crate::types::Communication;
use crate::validate::validate_communication;

impl SalesDb {
    // =========================================================================
    // Communications
    // =========================================================================

    /// Insert a logged interaction.
    pub fn insert_communication(&self, comm: &Communication) -> Result<(), StoreError> {
        validate_communication(comm)?;
        let blob = Self::encode_blob(comm)?;
        self.conn
            .execute(
                "INSERT INTO communications (
                    id, account_id, contact_id, opportunity_id, communication_type,
                    direction, subject, date, sentiment, sentiment_confidence, data_json
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    comm.id,
                    comm.account_id,
                    comm.contact_id,
                    comm.opportunity_id,
                    comm.communication_type.as_str(),
                    comm.direction.as_str(),
                    comm.subject,
                    comm.date.to_rfc3339(),
                    comm.sentiment.as_str(),
                    comm.sentiment_confidence,
                    blob,
                ],
            )
            .map_err(|e| StoreError::from_insert("communication", &comm.id, e))?;
        Ok(())
    }

    /// Get a communication by id.
    pub fn get_communication(&self, id: &str) -> Result<Communication, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data_json FROM communications WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Self::decode_blob(&raw),
            None => Err(StoreError::not_found("communication", id)),
        }
    }

    /// Scan communications by scalar-column predicates, in insertion order.
    pub fn query_communications(
        &self,
        filter: &CommunicationFilter,
    ) -> Result<Vec<Communication>, StoreError> {
        let mut sql = String::from("SELECT data_json FROM communications");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(account_id) = &filter.account_id {
            clauses.push("account_id = ?");
            params.push(Box::new(account_id.clone()));
        }
        if let Some(direction) = filter.direction {
            clauses.push("direction = ?");
            params.push(Box::new(direction.as_str()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        self.query_blobs(&sql, params)
    }

    /// Full-row replace of the communication stored under `id`.
    pub fn update_communication(&self, id: &str, comm: &Communication) -> Result<(), StoreError> {
        validate_communication(comm)?;
        let blob = Self::encode_blob(comm)?;
        let rows = self.conn.execute(
            "UPDATE communications SET
                account_id = ?2, contact_id = ?3, opportunity_id = ?4,
                communication_type = ?5, direction = ?6, subject = ?7, date = ?8,
                sentiment = ?9, sentiment_confidence = ?10, data_json = ?11
             WHERE id = ?1",
            params![
                id,
                comm.account_id,
                comm.contact_id,
                comm.opportunity_id,
                comm.communication_type.as_str(),
                comm.direction.as_str(),
                comm.subject,
                comm.date.to_rfc3339(),
                comm.sentiment.as_str(),
                comm.sentiment_confidence,
                blob,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("communication", id));
        }
        Ok(())
    }

    /// Delete a communication. A missing id is a silent no-op.
    pub fn delete_communication(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM communications WHERE id = ?1", params![id])?;
        Ok(())
    }
}
