use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::grade::ScoreTier;
use crate::analyzers::risk::{profile, RiskRules, RiskTier};
use crate::analyzers::yvs::{facility_score, ScoreBreakdown, ScoringWeights};
use crate::facility::{AdoptionStatus, Facility};

const DEMO_BASE_URL: &str = "https://app.freightroll.com/demo";

/// One row of the sales hit list: a facility with everything derived from it.
///
/// Kept flat so the same record serializes to JSON and to a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub rank: usize,
    pub facility_id: String,
    pub name: String,
    pub region: String,
    pub status: AdoptionStatus,
    pub yvs: f64,
    pub classification: ScoreTier,
    pub risk_score: Option<u32>,
    pub risk_tier: Option<RiskTier>,
    pub projected_annual_roi: f64,
    pub demo_link: String,
}

impl ScoreCard {
    pub fn from_facility(
        facility: &Facility,
        weights: &ScoringWeights,
        rules: &RiskRules,
    ) -> Self {
        let yvs = facility_score(facility, weights);
        let risk = profile(facility, weights, rules);

        ScoreCard {
            rank: 0,
            facility_id: facility.id.clone(),
            name: facility.name.clone(),
            region: facility.region.clone(),
            status: facility.adoption_status,
            yvs,
            classification: ScoreTier::from_score(yvs),
            risk_score: risk.as_ref().map(|r| r.score),
            risk_tier: risk.map(|r| r.tier),
            projected_annual_roi: facility.projected_annual_roi,
            demo_link: demo_link(&facility.name),
        }
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }
}

/// A single score query, flattened for the `score --output` CSV log.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRecord {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub paved_area_pct: f64,
    pub trailers: f64,
    pub gate_nodes: f64,
    pub yvs: f64,
    pub tier: ScoreTier,
}

impl ScoreRecord {
    pub fn from_breakdown(source: &str, breakdown: &ScoreBreakdown) -> Self {
        ScoreRecord {
            timestamp: Utc::now(),
            source: source.to_string(),
            paved_area_pct: breakdown.paved_area.raw_value,
            trailers: breakdown.trailer_count.raw_value,
            gate_nodes: breakdown.gate_nodes.raw_value,
            yvs: breakdown.total_score,
            tier: breakdown.classification.tier,
        }
    }
}

/// Builds score cards for every facility, ranked by YVS descending.
///
/// Ties go to the lower facility id.
pub fn hit_list<'a, I>(facilities: I, weights: &ScoringWeights, rules: &RiskRules) -> Vec<ScoreCard>
where
    I: IntoIterator<Item = &'a Facility>,
{
    let mut cards: Vec<ScoreCard> = facilities
        .into_iter()
        .map(|f| ScoreCard::from_facility(f, weights, rules))
        .collect();

    cards.sort_by(|a, b| {
        b.yvs
            .total_cmp(&a.yvs)
            .then_with(|| a.facility_id.cmp(&b.facility_id))
    });

    cards
        .into_iter()
        .enumerate()
        .map(|(i, card)| card.with_rank(i + 1))
        .collect()
}

/// URL slug for a facility name: lowercase, every space to `-`, `#` dropped,
/// `&` spelled out. Runs of spaces are kept as runs of dashes so existing
/// demo links stay stable.
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "-")
        .replace('#', "")
        .replace('&', "and")
}

pub fn demo_link(name: &str) -> String {
    format!("{}/{}", DEMO_BASE_URL, slug(name))
}
