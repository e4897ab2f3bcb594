use rusqlite::{params, OptionalExtension};

use super::*;
use crate::types::Account;
use crate::validate::validate_account;

impl SalesDb {
    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert a new account. Fails with `DuplicateKey` if the id exists and
    /// `Validation` if any field breaks its contract; nothing is written in
    /// either case.
    pub fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        validate_account(account)?;
        let blob = Self::encode_blob(account)?;
        self.conn
            .execute(
                "INSERT INTO accounts (
                    id, name, account_type, region, country, annual_revenue,
                    employee_count, health_score, churn_risk_score, lifetime_value,
                    created_date, last_activity_date, data_json
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    account.id,
                    account.name,
                    account.account_type.as_str(),
                    account.region,
                    account.country,
                    account.annual_revenue,
                    account.employee_count,
                    account.health_score,
                    account.churn_risk_score,
                    account.lifetime_value,
                    account.created_date.to_rfc3339(),
                    account.last_activity_date.to_rfc3339(),
                    blob,
                ],
            )
            .map_err(|e| StoreError::from_insert("account", &account.id, e))?;
        Ok(())
    }

    /// Get an account by id, decoded from its full blob.
    pub fn get_account(&self, id: &str) -> Result<Account, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT data_json FROM accounts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Self::decode_blob(&raw),
            None => Err(StoreError::not_found("account", id)),
        }
    }

    /// Scan accounts by scalar-column predicates, in insertion order.
    pub fn query_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, StoreError> {
        let mut sql = String::from("SELECT data_json FROM accounts");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(region) = &filter.region {
            clauses.push("region = ?");
            params.push(Box::new(region.clone()));
        }
        if let Some(account_type) = filter.account_type {
            clauses.push("account_type = ?");
            params.push(Box::new(account_type.as_str()));
        }
        if let Some(min) = filter.min_churn_risk {
            clauses.push("churn_risk_score >= ?");
            params.push(Box::new(min));
        }
        if let Some(max) = filter.max_churn_risk {
            clauses.push("churn_risk_score <= ?");
            params.push(Box::new(max));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        self.query_blobs(&sql, params)
    }

    /// Full-row replace of the account stored under `id`.
    pub fn update_account(&self, id: &str, account: &Account) -> Result<(), StoreError> {
        validate_account(account)?;
        let blob = Self::encode_blob(account)?;
        let rows = self.conn.execute(
            "UPDATE accounts SET
                name = ?2, account_type = ?3, region = ?4, country = ?5,
                annual_revenue = ?6, employee_count = ?7, health_score = ?8,
                churn_risk_score = ?9, lifetime_value = ?10, created_date = ?11,
                last_activity_date = ?12, data_json = ?13
             WHERE id = ?1",
            params![
                id,
                account.name,
                account.account_type.as_str(),
                account.region,
                account.country,
                account.annual_revenue,
                account.employee_count,
                account.health_score,
                account.churn_risk_score,
                account.lifetime_value,
                account.created_date.to_rfc3339(),
                account.last_activity_date.to_rfc3339(),
                blob,
            ],
        )?;
        if rows == 0 {
            return Err(StoreError::not_found("account", id));
        }
        Ok(())
    }

    /// Delete an account. A missing id is a silent no-op; children are
    /// orphaned, never cascaded.
    pub fn delete_account(&self, id: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM accounts WHERE id = ?1", params![id])?;
        Ok(())
    }
}
