//! Domain entities for the sales-intelligence store.
//!
//! Every entity serializes with serde (camelCase, like the rest of the API
//! surface) and is persisted twice: a handful of indexed scalar columns for
//! filtered scans, plus the full struct as a `data_json` blob for lossless
//! retrieval. Categories that are logically closed sets are real enums, so an
//! unknown value is a parse error rather than a silently-accepted string.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate an opaque entity id. Callers that already have one keep theirs.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Closed enumerations
// =============================================================================

/// Business-partner categories in the beverage ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Bottler,
    Retailer,
    Distributor,
    Qsr,
    Cinema,
    Stadium,
    ThemePark,
    Grocery,
    Convenience,
}

impl AccountType {
    /// Stable string form used in the `account_type` scalar column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bottler => "bottler",
            AccountType::Retailer => "retailer",
            AccountType::Distributor => "distributor",
            AccountType::Qsr => "qsr",
            AccountType::Cinema => "cinema",
            AccountType::Stadium => "stadium",
            AccountType::ThemePark => "theme_park",
            AccountType::Grocery => "grocery",
            AccountType::Convenience => "convenience",
        }
    }

    pub const ALL: [AccountType; 9] = [
        AccountType::Bottler,
        AccountType::Retailer,
        AccountType::Distributor,
        AccountType::Qsr,
        AccountType::Cinema,
        AccountType::Stadium,
        AccountType::ThemePark,
        AccountType::Grocery,
        AccountType::Convenience,
    ];
}

/// Product lines an account can carry. Lives only in the JSON blob, so no
/// scalar-column string form is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductLine {
    CocaColaClassic,
    CocaColaZeroSugar,
    DietCoke,
    CherryCoke,
    VanillaCoke,
    Sprite,
    SpriteZero,
    FantaOrange,
    FantaGrape,
    FantaStrawberry,
    MinuteMaidLemonade,
    MinuteMaidFruitPunch,
    MinuteMaidAppleJuice,
    Powerade,
    PoweradeZero,
    Smartwater,
    SmartwaterAlkaline,
    Dasani,
    CocaColaFreestyle,
    SimplyOrange,
    CostaCoffee,
}

impl ProductLine {
    pub const ALL: [ProductLine; 21] = [
        ProductLine::CocaColaClassic,
        ProductLine::CocaColaZeroSugar,
        ProductLine::DietCoke,
        ProductLine::CherryCoke,
        ProductLine::VanillaCoke,
        ProductLine::Sprite,
        ProductLine::SpriteZero,
        ProductLine::FantaOrange,
        ProductLine::FantaGrape,
        ProductLine::FantaStrawberry,
        ProductLine::MinuteMaidLemonade,
        ProductLine::MinuteMaidFruitPunch,
        ProductLine::MinuteMaidAppleJuice,
        ProductLine::Powerade,
        ProductLine::PoweradeZero,
        ProductLine::Smartwater,
        ProductLine::SmartwaterAlkaline,
        ProductLine::Dasani,
        ProductLine::CocaColaFreestyle,
        ProductLine::SimplyOrange,
        ProductLine::CostaCoffee,
    ];
}

/// Deal stages, ordered by pipeline progression. The derived `Ord` follows
/// declaration order, so `stage >= OpportunityStage::Proposal` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStage {
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStage::Prospecting => "prospecting",
            OpportunityStage::Qualification => "qualification",
            OpportunityStage::Proposal => "proposal",
            OpportunityStage::Negotiation => "negotiation",
            OpportunityStage::ClosedWon => "closed_won",
            OpportunityStage::ClosedLost => "closed_lost",
        }
    }

    /// Whether the deal has reached a terminal stage.
    pub fn is_closed(&self) -> bool {
        matches!(self, OpportunityStage::ClosedWon | OpportunityStage::ClosedLost)
    }

    pub const ALL: [OpportunityStage; 6] = [
        OpportunityStage::Prospecting,
        OpportunityStage::Qualification,
        OpportunityStage::Proposal,
        OpportunityStage::Negotiation,
        OpportunityStage::ClosedWon,
        OpportunityStage::ClosedLost,
    ];
}

/// Sentiment labels attached to logged communications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::VeryPositive => "very_positive",
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
            SentimentLabel::VeryNegative => "very_negative",
        }
    }

    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryPositive,
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
        SentimentLabel::VeryNegative,
    ];
}

/// How an interaction was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationType {
    Email,
    Call,
    Meeting,
    Visit,
}

impl CommunicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunicationType::Email => "email",
            CommunicationType::Call => "call",
            CommunicationType::Meeting => "meeting",
            CommunicationType::Visit => "visit",
        }
    }

    pub const ALL: [CommunicationType; 4] = [
        CommunicationType::Email,
        CommunicationType::Call,
        CommunicationType::Meeting,
        CommunicationType::Visit,
    ];
}

/// Direction of a communication relative to us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Insight priority. A closed set, unlike the free-string `insight_type`
/// whose values originate in model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A business partner: retailer, bottler, distributor, venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub region: String,
    pub country: String,
    pub annual_revenue: f64,
    pub employee_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_contact_id: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_activity_date: DateTime<Utc>,
    /// Relationship quality, 0–100.
    pub health_score: f64,
    /// Estimated likelihood of lapse, 0–100.
    pub churn_risk_score: f64,
    pub lifetime_value: f64,
    pub current_products: Vec<ProductLine>,
    // Freestyle machine summary, present only for accounts running the platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freestyle_machines_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_daily_pours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_uptime_percentage: Option<f64>,
    pub credit_rating: String,
    pub payment_terms: String,
    pub discount_tier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// A stakeholder at an account. Contacts ride along in memory and in
/// snapshots; the store does not give them a table of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub account_id: String,
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    #[serde(default)]
    pub decision_maker: bool,
    /// 1 (peripheral) to 10 (final say).
    pub influence_level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact_date: Option<DateTime<Utc>>,
    pub preferred_communication: CommunicationType,
}

/// A staged sales deal tied to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub description: String,
    pub stage: OpportunityStage,
    /// Win likelihood, 0–100. Expected to rise with stage, not enforced.
    pub probability: f64,
    pub amount: f64,
    pub expected_close_date: NaiveDate,
    pub created_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub owner_id: String,
    pub product_lines: Vec<ProductLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_best_action: Option<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub success_factors: Vec<String>,
}

/// A logged interaction with an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    pub id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<String>,
    pub communication_type: CommunicationType,
    pub subject: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub direction: Direction,
    pub sentiment: SentimentLabel,
    /// Classifier confidence for the sentiment label, 0–1.
    pub sentiment_confidence: f64,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

/// A structured recommendation, human- or model-generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_id: Option<String>,
    /// Free-form category, e.g. "churn_risk", "upsell_opportunity".
    pub insight_type: String,
    pub title: String,
    pub description: String,
    /// Model confidence, 0–1.
    pub confidence: f64,
    pub priority: Priority,
    pub recommended_actions: Vec<String>,
    /// Opaque evidence blob handed back by the model.
    #[serde(default)]
    pub supporting_data: serde_json::Value,
    pub created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub acted_upon: bool,
}

impl AiInsight {
    /// A stale insight has outlived its expiry. It stays in the store —
    /// staleness is a read-side judgment, never a deletion.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.expires_date.map(|expiry| expiry < now).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering_follows_pipeline() {
        assert!(OpportunityStage::Prospecting < OpportunityStage::Qualification);
        assert!(OpportunityStage::Negotiation < OpportunityStage::ClosedWon);
        assert!(!OpportunityStage::Proposal.is_closed());
        assert!(OpportunityStage::ClosedLost.is_closed());
    }

    #[test]
    fn test_enum_serde_uses_snake_case_wire_values() {
        let json = serde_json::to_string(&AccountType::ThemePark).unwrap();
        assert_eq!(json, "\"theme_park\"");
        let json = serde_json::to_string(&ProductLine::CocaColaZeroSugar).unwrap();
        assert_eq!(json, "\"coca_cola_zero_sugar\"");
        let json = serde_json::to_string(&SentimentLabel::VeryNegative).unwrap();
        assert_eq!(json, "\"very_negative\"");
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let parsed: Result<AccountType, _> = serde_json::from_str("\"nightclub\"");
        assert!(parsed.is_err(), "open strings must not sneak into closed sets");

        let parsed: Result<OpportunityStage, _> = serde_json::from_str("\"renegotiation\"");
        assert!(parsed.is_err());

        let parsed: Result<Priority, _> = serde_json::from_str("\"urgent\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_stage_string_round_trip() {
        for stage in OpportunityStage::ALL {
            let json = format!("\"{}\"", stage.as_str());
            let back: OpportunityStage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_insight_staleness() {
        let now = Utc::now();
        let mut insight = AiInsight {
            id: new_entity_id(),
            account_id: None,
            opportunity_id: None,
            insight_type: "churn_risk".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            confidence: 0.9,
            priority: Priority::High,
            recommended_actions: vec![],
            supporting_data: serde_json::Value::Null,
            created_date: now,
            expires_date: None,
            acted_upon: false,
        };
        assert!(!insight.is_stale(now), "no expiry means never stale");

        insight.expires_date = Some(now - chrono::Duration::days(1));
        assert!(insight.is_stale(now));

        insight.expires_date = Some(now + chrono::Duration::days(1));
        assert!(!insight.is_stale(now));
    }
}
