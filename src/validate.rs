//! Field-contract validation for every entity.
//!
//! Pure and storage-free: callers validate before a write reaches SQLite,
//! reads are never validated. Each check appends to a violation list rather
//! than bailing on the first problem, so a caller fixing bad input sees the
//! whole picture in one round trip. Enum membership needs no checks here —
//! closed sets are enforced at deserialization by the types themselves.

use std::fmt;

use serde::Serialize;

use crate::types::{Account, AiInsight, Communication, Contact, Opportunity};

/// One failed field check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found in a single validation pass, in field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationErrors(pub Vec<Violation>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names of every violation, for terse assertions and logs.
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|v| format!("{}: {}", v.field, v.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates violations across the checks for one entity.
struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    fn new() -> Self {
        Self { violations: Vec::new() }
    }

    fn require(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.violations.push(Violation {
                field,
                message: "must not be empty".to_string(),
            });
        }
    }

    fn range_f64(&mut self, field: &'static str, value: f64, lo: f64, hi: f64) {
        if !value.is_finite() || value < lo || value > hi {
            self.violations.push(Violation {
                field,
                message: format!("must be within [{lo}, {hi}], got {value}"),
            });
        }
    }

    fn range_i64(&mut self, field: &'static str, value: i64, lo: i64, hi: i64) {
        if value < lo || value > hi {
            self.violations.push(Violation {
                field,
                message: format!("must be within [{lo}, {hi}], got {value}"),
            });
        }
    }

    fn non_negative(&mut self, field: &'static str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.violations.push(Violation {
                field,
                message: format!("must be non-negative, got {value}"),
            });
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.violations))
        }
    }
}

/// Validate an account against its field contract.
pub fn validate_account(account: &Account) -> Result<(), ValidationErrors> {
    let mut c = Checker::new();
    c.require("id", &account.id);
    c.require("name", &account.name);
    c.require("region", &account.region);
    c.require("country", &account.country);
    c.require("credit_rating", &account.credit_rating);
    c.require("payment_terms", &account.payment_terms);
    c.require("discount_tier", &account.discount_tier);
    c.non_negative("annual_revenue", account.annual_revenue);
    c.non_negative("lifetime_value", account.lifetime_value);
    c.range_f64("health_score", account.health_score, 0.0, 100.0);
    c.range_f64("churn_risk_score", account.churn_risk_score, 0.0, 100.0);
    if account.employee_count < 0 {
        c.violations.push(Violation {
            field: "employee_count",
            message: format!("must be non-negative, got {}", account.employee_count),
        });
    }
    if account.created_date > account.last_activity_date {
        c.violations.push(Violation {
            field: "last_activity_date",
            message: "must not precede created_date".to_string(),
        });
    }
    if let Some(count) = account.freestyle_machines_count {
        if count < 0 {
            c.violations.push(Violation {
                field: "freestyle_machines_count",
                message: format!("must be non-negative, got {count}"),
            });
        }
    }
    if let Some(pours) = account.avg_daily_pours {
        c.non_negative("avg_daily_pours", pours);
    }
    if let Some(uptime) = account.machine_uptime_percentage {
        c.range_f64("machine_uptime_percentage", uptime, 0.0, 100.0);
    }
    if let Some(lat) = account.latitude {
        c.range_f64("latitude", lat, -90.0, 90.0);
    }
    if let Some(lng) = account.longitude {
        c.range_f64("longitude", lng, -180.0, 180.0);
    }
    c.finish()
}

/// Validate a contact against its field contract.
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationErrors> {
    let mut c = Checker::new();
    c.require("id", &contact.id);
    c.require("account_id", &contact.account_id);
    c.require("first_name", &contact.first_name);
    c.require("last_name", &contact.last_name);
    c.require("title", &contact.title);
    if !contact.email.contains('@') {
        c.violations.push(Violation {
            field: "email",
            message: format!("not a plausible address: {:?}", contact.email),
        });
    }
    c.range_i64("influence_level", contact.influence_level as i64, 1, 10);
    c.finish()
}

/// Validate an opportunity against its field contract.
pub fn validate_opportunity(opportunity: &Opportunity) -> Result<(), ValidationErrors> {
    let mut c = Checker::new();
    c.require("id", &opportunity.id);
    c.require("account_id", &opportunity.account_id);
    c.require("name", &opportunity.name);
    c.require("owner_id", &opportunity.owner_id);
    c.range_f64("probability", opportunity.probability, 0.0, 100.0);
    c.non_negative("amount", opportunity.amount);
    c.finish()
}

/// Validate a communication against its field contract.
pub fn validate_communication(comm: &Communication) -> Result<(), ValidationErrors> {
    let mut c = Checker::new();
    c.require("id", &comm.id);
    c.require("account_id", &comm.account_id);
    c.require("subject", &comm.subject);
    c.range_f64("sentiment_confidence", comm.sentiment_confidence, 0.0, 1.0);
    c.finish()
}

/// Validate an insight against its field contract.
pub fn validate_insight(insight: &AiInsight) -> Result<(), ValidationErrors> {
    let mut c = Checker::new();
    c.require("id", &insight.id);
    c.require("insight_type", &insight.insight_type);
    c.require("title", &insight.title);
    c.range_f64("confidence", insight.confidence, 0.0, 1.0);
    c.finish()
}
