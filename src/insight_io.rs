//! Serialization boundary between the store and the remote-model collaborator.
//!
//! Outbound: entity and pipeline snapshots flattened to plain JSON, ready to
//! drop into a prompt context. Inbound: the model's response — free text with
//! optional structured fields — parsed into an `AiInsight` and pushed through
//! the same validation gate as any other write. The model call itself lives
//! elsewhere; this module owns only the two edges of the exchange.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::db::{
    CommunicationFilter, OpportunityFilter, SalesDb, StoreError,
};
use crate::types::{new_entity_id, AiInsight, Priority};
use crate::validate::validate_insight;

/// How many recent communications ride along in an account snapshot.
const SNAPSHOT_COMMUNICATION_LIMIT: usize = 10;

/// Bundle an account with its opportunities and most recent communications
/// into one plain key-value payload.
pub fn account_snapshot(db: &SalesDb, account_id: &str) -> Result<Value, StoreError> {
    let account = db.get_account(account_id)?;

    let opportunities = db.query_opportunities(&OpportunityFilter {
        account_id: Some(account_id.to_string()),
        ..Default::default()
    })?;

    let mut communications = db.query_communications(&CommunicationFilter {
        account_id: Some(account_id.to_string()),
        ..Default::default()
    })?;
    // Most recent first, capped — the model doesn't need the full history
    communications.sort_by(|a, b| b.date.cmp(&a.date));
    communications.truncate(SNAPSHOT_COMMUNICATION_LIMIT);

    Ok(json!({
        "account": account,
        "opportunities": opportunities,
        "recentCommunications": communications,
    }))
}

/// Summarize open pipeline state: stage counts, total open value, and deals
/// whose probability has sagged below 30.
pub fn pipeline_snapshot(db: &SalesDb) -> Result<Value, StoreError> {
    let all = db.query_opportunities(&OpportunityFilter::default())?;

    let open: Vec<_> = all.iter().filter(|o| !o.stage.is_closed()).collect();
    let pipeline_value: f64 = open.iter().map(|o| o.amount).sum();
    let at_risk_count = open.iter().filter(|o| o.probability < 30.0).count();

    let mut stage_counts = serde_json::Map::new();
    for stage in crate::types::OpportunityStage::ALL {
        let count = all.iter().filter(|o| o.stage == stage).count();
        stage_counts.insert(stage.as_str().to_string(), json!(count));
    }

    Ok(json!({
        "openOpportunities": open.len(),
        "pipelineValue": pipeline_value,
        "atRiskCount": at_risk_count,
        "stageCounts": Value::Object(stage_counts),
    }))
}

/// Structured fields the model may return alongside (or instead of) prose.
/// Unknown enum values — e.g. an invented priority — fail the parse rather
/// than being accepted and ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInsightFields {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    insight_type: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    recommended_actions: Vec<String>,
    #[serde(default)]
    supporting_data: Option<Value>,
    #[serde(default)]
    expires_date: Option<DateTime<Utc>>,
}

/// Turn a model response into a validated `AiInsight`.
///
/// If `raw` parses as a JSON object, its fields are taken as structured
/// output: bad field values (an out-of-range confidence, an unknown priority)
/// are errors, not something to paper over. Anything else is treated as
/// opaque prose and wrapped with conservative defaults. Either way the result
/// passes `validate_insight` before it is returned for persistence.
pub fn parse_model_insight(
    raw: &str,
    account_id: Option<&str>,
    opportunity_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<AiInsight, StoreError> {
    let insight = match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => {
            let fields: ModelInsightFields = serde_json::from_value(value)?;
            AiInsight {
                id: new_entity_id(),
                account_id: account_id.map(|s| s.to_string()),
                opportunity_id: opportunity_id.map(|s| s.to_string()),
                insight_type: fields.insight_type.unwrap_or_else(|| "general".to_string()),
                title: fields
                    .title
                    .unwrap_or_else(|| "Model-generated insight".to_string()),
                description: fields.description.unwrap_or_default(),
                confidence: fields.confidence.unwrap_or(0.5),
                priority: fields.priority.unwrap_or(Priority::Medium),
                recommended_actions: fields.recommended_actions,
                supporting_data: fields.supporting_data.unwrap_or(Value::Null),
                created_date: now,
                expires_date: fields.expires_date,
                acted_upon: false,
            }
        }
        // Not a JSON object: opaque prose. First line doubles as the title.
        _ => {
            let text = raw.trim();
            let title = text
                .lines()
                .next()
                .map(|line| line.chars().take(80).collect::<String>())
                .filter(|line| !line.is_empty())
                .unwrap_or_else(|| "Model-generated insight".to_string());
            AiInsight {
                id: new_entity_id(),
                account_id: account_id.map(|s| s.to_string()),
                opportunity_id: opportunity_id.map(|s| s.to_string()),
                insight_type: "general".to_string(),
                title,
                description: text.to_string(),
                confidence: 0.5,
                priority: Priority::Medium,
                recommended_actions: vec![],
                supporting_data: Value::Null,
                created_date: now,
                expires_date: None,
                acted_upon: false,
            }
        }
    };

    validate_insight(&insight)?;
    Ok(insight)
}
