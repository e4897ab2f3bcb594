//! Synthetic demo dataset generation.
//!
//! Seeds the store with the beverage-industry dataset the dashboards display:
//! named partner accounts across nine account types and six North-America
//! regions, contacts with decision-maker weighting, stage-correlated
//! opportunities, sentiment-labelled communications, and a starter batch of
//! insights for the riskiest accounts. Deterministic for a fixed `seed` and
//! `anchor`. Every generated entity goes through the normal insert path, so
//! it passes validation like real data would.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{RngExt, SeedableRng};
use serde_json::json;

use crate::db::{SalesDb, StoreError};
use crate::types::*;

const BOTTLER_NAMES: &[&str] = &[
    "Atlanta Coca-Cola Bottling",
    "Coca-Cola Consolidated",
    "Swire Coca-Cola USA",
    "Great Lakes Coca-Cola",
    "Coca-Cola Bottling Co. United",
    "Buffalo Rock Company",
    "Liberty Coca-Cola Beverages",
    "Rocky Mountain Bottling",
];

const RETAILER_NAMES: &[&str] = &[
    "Walmart Supercenters",
    "Target Corporation",
    "Kroger Grocery Chain",
    "Publix Super Markets",
    "Meijer Supercenters",
    "H-E-B Grocery Company",
    "Wegmans Food Markets",
    "Giant Eagle Markets",
];

const QSR_NAMES: &[&str] = &[
    "Burger Palace Chain",
    "Taco Fiesta Restaurants",
    "Pizza Corner",
    "Chicken Express",
    "Sandwich Station",
    "Quick Eats",
    "Drive-Thru Delights",
    "Express Diner",
];

const CINEMA_NAMES: &[&str] = &[
    "MovieMax Theaters",
    "CinemaWorld",
    "Starlight Cinemas",
    "Grand Theater Chain",
    "Screen Palace",
    "Vista Cinemas",
];

const STADIUM_NAMES: &[&str] = &[
    "Mercedes-Benz Stadium",
    "AT&T Stadium",
    "MetLife Stadium",
    "Lambeau Field",
    "Arrowhead Stadium",
    "SoFi Stadium",
];

const VENUE_NAMES: &[&str] = &[
    "Adventure Springs Park",
    "Thrill Valley Resort",
    "Wonder Coast Park",
    "Summit Peaks Resort",
];

const DISTRIBUTOR_NAMES: &[&str] = &[
    "Midwest Beverage Distribution",
    "Coastal Beverage Partners",
    "Summit Distribution Group",
    "Heartland Beverage Supply",
];

const GROCERY_NAMES: &[&str] = &[
    "Fresh Market Collective",
    "Valley Grocers Alliance",
    "Hometown Market Group",
    "Corner Harvest Markets",
];

const CONVENIENCE_NAMES: &[&str] = &[
    "QuickStop Stores",
    "Daybreak Convenience",
    "Roadside Express Marts",
    "Metro Corner Shops",
];

const REGIONS: &[&str] = &[
    "North America - East",
    "North America - Central",
    "North America - West",
    "North America - Southeast",
    "North America - Southwest",
    "North America - Northwest",
];

const COUNTRIES: &[&str] = &["United States", "Canada", "Mexico"];

const JOB_TITLES: &[&str] = &[
    "CEO",
    "President",
    "VP of Operations",
    "General Manager",
    "Operations Director",
    "Purchasing Manager",
    "Category Manager",
    "Regional Manager",
    "Marketing Director",
    "Sales Director",
    "Procurement Specialist",
];

const DEPARTMENTS: &[&str] = &["Operations", "Purchasing", "Marketing", "Sales", "Executive"];

const FIRST_NAMES: &[&str] = &[
    "Ava", "Marcus", "Priya", "Daniel", "Sofia", "James", "Elena", "Omar", "Grace", "Victor",
    "Nadia", "Caleb", "Ruth", "Hector", "Imani",
];

const LAST_NAMES: &[&str] = &[
    "Nguyen", "Okafor", "Ramirez", "Schmidt", "Park", "Johnson", "Rossi", "Haddad", "Kowalski",
    "Brooks", "Tanaka", "Moreau", "Silva", "Novak", "Osei",
];

const OPPORTUNITY_NAMES: &[&str] = &[
    "Annual Contract Renewal",
    "Q1 Volume Expansion",
    "Coca-Cola Freestyle Installation",
    "New Product Line Introduction",
    "Promotional Campaign Partnership",
    "Market Share Growth Initiative",
    "Summer Beverage Program",
    "Holiday Season Partnership",
    "smartwater Portfolio Expansion",
    "Powerade Distribution Agreement",
];

const COMMUNICATION_SUBJECTS: &[&str] = &[
    "Q4 Volume Commitment Discussion",
    "New Product Launch Collaboration",
    "Promotional Calendar Review",
    "Freestyle Machine Performance",
    "Contract Renewal Terms",
    "Market Share Analysis",
    "Category Management Support",
    "Supply Chain Optimization",
    "Pricing Discussion",
    "Performance Review Meeting",
];

/// Dataset shape. Defaults match the original demo: 50 accounts, 200 deals,
/// 500 logged communications.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub accounts: usize,
    pub opportunities: usize,
    pub communications: usize,
    /// Starter insights, attached to the riskiest accounts.
    pub insights: usize,
    /// RNG seed; same seed + same anchor = same dataset.
    pub seed: u64,
    /// Timestamp all relative dates hang off.
    pub anchor: DateTime<Utc>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            accounts: 50,
            opportunities: 200,
            communications: 500,
            insights: 12,
            seed: 47,
            anchor: Utc::now(),
        }
    }
}

/// Row counts written by a seeding pass. Contacts are generated and wired into
/// accounts/communications but have no table of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts: usize,
    pub contacts: usize,
    pub opportunities: usize,
    pub communications: usize,
    pub insights: usize,
}

/// Generate and persist the full synthetic dataset.
pub fn seed(db: &SalesDb, config: &SeedConfig) -> Result<SeedSummary, StoreError> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let (accounts, contacts) = generate_accounts(&mut rng, config);
    for account in &accounts {
        db.insert_account(account)?;
    }

    let opportunities = generate_opportunities(&mut rng, config, &accounts);
    for opportunity in &opportunities {
        db.insert_opportunity(opportunity)?;
    }

    let communications =
        generate_communications(&mut rng, config, &accounts, &contacts, &opportunities);
    for comm in &communications {
        db.insert_communication(comm)?;
    }

    let insights = generate_insights(&mut rng, config, &accounts);
    for insight in &insights {
        db.insert_insight(insight)?;
    }

    let summary = SeedSummary {
        accounts: accounts.len(),
        contacts: contacts.len(),
        opportunities: opportunities.len(),
        communications: communications.len(),
        insights: insights.len(),
    };
    log::info!(
        "Seeded demo data: {} accounts, {} contacts, {} opportunities, {} communications, {} insights",
        summary.accounts,
        summary.contacts,
        summary.opportunities,
        summary.communications,
        summary.insights
    );
    Ok(summary)
}

fn pick<'a>(rng: &mut StdRng, pool: &'a [&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or("Unnamed")
}

fn name_pool(account_type: AccountType) -> &'static [&'static str] {
    match account_type {
        AccountType::Bottler => BOTTLER_NAMES,
        AccountType::Retailer => RETAILER_NAMES,
        AccountType::Qsr => QSR_NAMES,
        AccountType::Cinema => CINEMA_NAMES,
        AccountType::Stadium => STADIUM_NAMES,
        AccountType::ThemePark => VENUE_NAMES,
        AccountType::Distributor => DISTRIBUTOR_NAMES,
        AccountType::Grocery => GROCERY_NAMES,
        AccountType::Convenience => CONVENIENCE_NAMES,
    }
}

/// Revenue, headcount, and lifetime-value tiers by partner class.
fn financial_tier(rng: &mut StdRng, account_type: AccountType) -> (f64, i64, f64) {
    match account_type {
        AccountType::Bottler => (
            rng.random_range(50_000_000.0..500_000_000.0),
            rng.random_range(200..=2000),
            rng.random_range(5_000_000.0..50_000_000.0),
        ),
        AccountType::Retailer | AccountType::Grocery => (
            rng.random_range(10_000_000.0..100_000_000.0),
            rng.random_range(100..=1000),
            rng.random_range(1_000_000.0..10_000_000.0),
        ),
        AccountType::Qsr | AccountType::Distributor => (
            rng.random_range(5_000_000.0..50_000_000.0),
            rng.random_range(50..=500),
            rng.random_range(500_000.0..5_000_000.0),
        ),
        _ => (
            rng.random_range(1_000_000.0..20_000_000.0),
            rng.random_range(20..=200),
            rng.random_range(100_000.0..2_000_000.0),
        ),
    }
}

fn generate_accounts(rng: &mut StdRng, config: &SeedConfig) -> (Vec<Account>, Vec<Contact>) {
    let mut accounts = Vec::with_capacity(config.accounts);
    let mut contacts = Vec::new();

    for _ in 0..config.accounts {
        let account_type = *AccountType::ALL.choose(rng).unwrap_or(&AccountType::Retailer);
        let (annual_revenue, employee_count, lifetime_value) = financial_tier(rng, account_type);

        // Health drives churn: weaker relationships skew riskier, clamped to range
        let health_score: f64 = rng.random_range(60.0..95.0);
        let churn_risk_score: f64 =
            (100.0 - health_score + rng.random_range::<f64, _>(-10.0..10.0)).clamp(0.0, 100.0);

        let product_count = if annual_revenue > 10_000_000.0 {
            rng.random_range(2..=6)
        } else {
            rng.random_range(1..=3)
        };
        let current_products: Vec<ProductLine> = ProductLine::ALL
            .choose_multiple(rng, product_count)
            .copied()
            .collect();

        let runs_freestyle = current_products.contains(&ProductLine::CocaColaFreestyle);

        let id = new_entity_id();
        let created_date = config.anchor - Duration::days(rng.random_range(180..720));
        let last_activity_date = config.anchor - Duration::days(rng.random_range(0..30));

        let mut account = Account {
            id: id.clone(),
            name: pick(rng, name_pool(account_type)).to_string(),
            account_type,
            region: pick(rng, REGIONS).to_string(),
            country: pick(rng, COUNTRIES).to_string(),
            annual_revenue,
            employee_count,
            primary_contact_id: None,
            created_date,
            last_activity_date,
            health_score,
            churn_risk_score,
            lifetime_value,
            current_products,
            freestyle_machines_count: runs_freestyle.then(|| rng.random_range(1..=10)),
            avg_daily_pours: runs_freestyle.then(|| rng.random_range(200.0..1500.0)),
            machine_uptime_percentage: runs_freestyle.then(|| rng.random_range(85.0..99.0)),
            credit_rating: pick(rng, &["A+", "A", "A-", "B+", "B", "B-"]).to_string(),
            payment_terms: pick(rng, &["Net 30", "Net 45", "Net 60", "2/10 Net 30"]).to_string(),
            discount_tier: pick(rng, &["Platinum", "Gold", "Silver", "Bronze"]).to_string(),
            latitude: None,
            longitude: None,
        };

        // 2-5 stakeholders per account; the first is always the decision maker
        // and becomes the account's primary contact.
        let contact_count = rng.random_range(2..=5);
        for i in 0..contact_count {
            let decision_maker = i == 0;
            let first_name = pick(rng, FIRST_NAMES).to_string();
            let last_name = pick(rng, LAST_NAMES).to_string();
            let contact = Contact {
                id: new_entity_id(),
                account_id: id.clone(),
                email: format!(
                    "{}.{}@example.com",
                    first_name.to_lowercase(),
                    last_name.to_lowercase()
                ),
                first_name,
                last_name,
                title: pick(rng, JOB_TITLES).to_string(),
                phone: format!("+1-555-{:04}", rng.random_range(0..10_000)),
                department: pick(rng, DEPARTMENTS).to_string(),
                decision_maker,
                influence_level: if decision_maker {
                    rng.random_range(7..=10)
                } else {
                    rng.random_range(3..=8)
                },
                last_contact_date: Some(config.anchor - Duration::days(rng.random_range(0..60))),
                preferred_communication: *CommunicationType::ALL
                    .choose(rng)
                    .unwrap_or(&CommunicationType::Email),
            };
            if decision_maker {
                account.primary_contact_id = Some(contact.id.clone());
            }
            contacts.push(contact);
        }

        accounts.push(account);
    }

    (accounts, contacts)
}

/// Probability band for a stage, mirroring how the pipeline really behaves:
/// terminal stages are certain, everything else is a range.
fn stage_probability(rng: &mut StdRng, stage: OpportunityStage) -> f64 {
    match stage {
        OpportunityStage::Prospecting => rng.random_range(10.0..30.0),
        OpportunityStage::Qualification => rng.random_range(25.0..45.0),
        OpportunityStage::Proposal => rng.random_range(40.0..70.0),
        OpportunityStage::Negotiation => rng.random_range(60.0..85.0),
        OpportunityStage::ClosedWon => 100.0,
        OpportunityStage::ClosedLost => 0.0,
    }
}

fn generate_opportunities(
    rng: &mut StdRng,
    config: &SeedConfig,
    accounts: &[Account],
) -> Vec<Opportunity> {
    let mut opportunities = Vec::with_capacity(config.opportunities);
    if accounts.is_empty() {
        return opportunities;
    }

    for _ in 0..config.opportunities {
        let account = &accounts[rng.random_range(0..accounts.len())];
        let stage = *OpportunityStage::ALL
            .choose(rng)
            .unwrap_or(&OpportunityStage::Prospecting);

        // Deal size tracks account size: roughly 5-15% of annual revenue
        let base_amount = account.annual_revenue * 0.1;
        let amount = rng.random_range((base_amount * 0.5)..(base_amount * 1.5));

        let line_count = rng.random_range(1..=account.current_products.len().max(1));
        let product_lines: Vec<ProductLine> = account
            .current_products
            .choose_multiple(rng, line_count)
            .copied()
            .collect();

        opportunities.push(Opportunity {
            id: new_entity_id(),
            account_id: account.id.clone(),
            name: format!("{} - {}", account.name, pick(rng, OPPORTUNITY_NAMES)),
            description: format!(
                "{} engagement with {} covering {} product line(s).",
                stage.as_str(),
                account.name,
                product_lines.len()
            ),
            stage,
            probability: stage_probability(rng, stage),
            amount,
            expected_close_date: (config.anchor + Duration::days(rng.random_range(0..180)))
                .date_naive(),
            created_date: config.anchor - Duration::days(rng.random_range(10..90)),
            last_modified_date: config.anchor - Duration::days(rng.random_range(0..10)),
            owner_id: new_entity_id(),
            product_lines,
            next_best_action: None,
            risk_factors: vec![],
            success_factors: vec![],
        });
    }

    opportunities
}

fn sentiment_content(sentiment: SentimentLabel, subject: &str, account_name: &str) -> String {
    match sentiment {
        SentimentLabel::VeryPositive => format!(
            "Excellent meeting about {}. {} wants to move forward quickly and is \
             interested in expanding volume commitments.",
            subject.to_lowercase(),
            account_name
        ),
        SentimentLabel::Positive => format!(
            "Good discussion regarding {}. The {} team is supportive and receptive, \
             with some questions about timeline.",
            subject.to_lowercase(),
            account_name
        ),
        SentimentLabel::Neutral => format!(
            "Routine check-in on {}. No major updates from {} either way.",
            subject.to_lowercase(),
            account_name
        ),
        SentimentLabel::Negative => format!(
            "Difficult conversation about {}. {} raised concerns about pricing and \
             service levels that need follow-up.",
            subject.to_lowercase(),
            account_name
        ),
        SentimentLabel::VeryNegative => format!(
            "Escalation on {}. {} is frustrated and weighing competitor offers; \
             immediate attention required.",
            subject.to_lowercase(),
            account_name
        ),
    }
}

fn generate_communications(
    rng: &mut StdRng,
    config: &SeedConfig,
    accounts: &[Account],
    contacts: &[Contact],
    opportunities: &[Opportunity],
) -> Vec<Communication> {
    let mut communications = Vec::with_capacity(config.communications);
    if accounts.is_empty() {
        return communications;
    }

    for _ in 0..config.communications {
        let account = &accounts[rng.random_range(0..accounts.len())];

        let account_contacts: Vec<&Contact> = contacts
            .iter()
            .filter(|c| c.account_id == account.id)
            .collect();
        let contact_id = account_contacts
            .choose(rng)
            .map(|c| c.id.clone());

        // About a third of interactions tie back to a live deal
        let account_opportunities: Vec<&Opportunity> = opportunities
            .iter()
            .filter(|o| o.account_id == account.id)
            .collect();
        let opportunity_id = if rng.random_bool(0.3) {
            account_opportunities.choose(rng).map(|o| o.id.clone())
        } else {
            None
        };

        let sentiment = *SentimentLabel::ALL
            .choose(rng)
            .unwrap_or(&SentimentLabel::Neutral);
        let subject = pick(rng, COMMUNICATION_SUBJECTS).to_string();
        let content = sentiment_content(sentiment, &subject, &account.name);

        communications.push(Communication {
            id: new_entity_id(),
            account_id: account.id.clone(),
            contact_id,
            opportunity_id,
            communication_type: *CommunicationType::ALL
                .choose(rng)
                .unwrap_or(&CommunicationType::Email),
            subject,
            content,
            date: config.anchor - Duration::days(rng.random_range(0..90)),
            direction: if rng.random_bool(0.5) {
                Direction::Inbound
            } else {
                Direction::Outbound
            },
            sentiment,
            sentiment_confidence: rng.random_range(0.7..0.95),
            key_topics: vec![],
            action_items: vec![],
        });
    }

    communications
}

fn generate_insights(
    rng: &mut StdRng,
    config: &SeedConfig,
    accounts: &[Account],
) -> Vec<AiInsight> {
    // Riskiest accounts first
    let mut ranked: Vec<&Account> = accounts.iter().collect();
    ranked.sort_by(|a, b| {
        b.churn_risk_score
            .partial_cmp(&a.churn_risk_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
        .into_iter()
        .take(config.insights)
        .map(|account| {
            let priority = if account.churn_risk_score > 70.0 {
                Priority::High
            } else if account.churn_risk_score > 40.0 {
                Priority::Medium
            } else {
                Priority::Low
            };
            AiInsight {
                id: new_entity_id(),
                account_id: Some(account.id.clone()),
                opportunity_id: None,
                insight_type: "churn_risk".to_string(),
                title: format!("Churn watch: {}", account.name),
                description: format!(
                    "{} carries a churn risk score of {:.0}; recent engagement cadence \
                     suggests intervention.",
                    account.name, account.churn_risk_score
                ),
                confidence: rng.random_range(0.7..0.95),
                priority,
                recommended_actions: vec![
                    "Schedule executive business review".to_string(),
                    "Offer volume incentive program".to_string(),
                ],
                supporting_data: json!({
                    "churnRiskScore": account.churn_risk_score,
                    "healthScore": account.health_score,
                }),
                created_date: config.anchor,
                expires_date: Some(config.anchor + Duration::days(30)),
                acted_upon: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::db::test_utils::test_db;
    use crate::db::{AccountFilter, InsightFilter, OpportunityFilter};
    use crate::validate::validate_contact;

    fn small_config() -> SeedConfig {
        SeedConfig {
            accounts: 8,
            opportunities: 20,
            communications: 30,
            insights: 4,
            seed: 7,
            anchor: Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_seed_writes_requested_counts() {
        let db = test_db();
        let summary = seed(&db, &small_config()).expect("seed");
        assert_eq!(summary.accounts, 8);
        assert_eq!(summary.opportunities, 20);
        assert_eq!(summary.communications, 30);
        assert_eq!(summary.insights, 4);
        assert!(summary.contacts >= 16, "2-5 contacts per account");

        let accounts = db.query_accounts(&AccountFilter::default()).expect("query");
        assert_eq!(accounts.len(), 8);
        let opportunities = db
            .query_opportunities(&OpportunityFilter::default())
            .expect("query");
        assert_eq!(opportunities.len(), 20);
        let insights = db.query_insights(&InsightFilter::default()).expect("query");
        assert_eq!(insights.len(), 4);
    }

    #[test]
    fn test_generated_data_is_deterministic() {
        let config = small_config();
        let mut rng_a = StdRng::seed_from_u64(config.seed);
        let mut rng_b = StdRng::seed_from_u64(config.seed);

        let (accounts_a, contacts_a) = generate_accounts(&mut rng_a, &config);
        let (accounts_b, contacts_b) = generate_accounts(&mut rng_b, &config);
        assert_eq!(accounts_a, accounts_b);
        assert_eq!(contacts_a, contacts_b);
    }

    #[test]
    fn test_generated_contacts_pass_validation() {
        let config = small_config();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (accounts, contacts) = generate_accounts(&mut rng, &config);

        for contact in &contacts {
            validate_contact(contact).expect("generated contact must validate");
        }
        // Every account got a decision-maker primary contact
        for account in &accounts {
            let primary = account.primary_contact_id.as_ref().expect("primary set");
            let contact = contacts.iter().find(|c| &c.id == primary).expect("exists");
            assert!(contact.decision_maker);
        }
    }

    #[test]
    fn test_closed_stages_have_terminal_probabilities() {
        let db = test_db();
        seed(&db, &small_config()).expect("seed");

        let all = db
            .query_opportunities(&OpportunityFilter::default())
            .expect("query");
        for opp in all {
            match opp.stage {
                OpportunityStage::ClosedWon => assert_eq!(opp.probability, 100.0),
                OpportunityStage::ClosedLost => assert_eq!(opp.probability, 0.0),
                _ => assert!(opp.probability > 0.0 && opp.probability < 100.0),
            }
        }
    }

    #[test]
    fn test_insights_target_riskiest_accounts() {
        let db = test_db();
        seed(&db, &small_config()).expect("seed");

        let accounts = db.query_accounts(&AccountFilter::default()).expect("query");
        let insights = db.query_insights(&InsightFilter::default()).expect("query");

        let mut churn_ranked: Vec<f64> = accounts.iter().map(|a| a.churn_risk_score).collect();
        churn_ranked.sort_by(|a, b| b.partial_cmp(a).unwrap());
        let cutoff = churn_ranked[insights.len() - 1];

        for insight in &insights {
            let account_id = insight.account_id.as_ref().expect("linked");
            let account = accounts.iter().find(|a| &a.id == account_id).expect("exists");
            assert!(account.churn_risk_score >= cutoff);
            assert_eq!(insight.insight_type, "churn_risk");
        }
    }
}
