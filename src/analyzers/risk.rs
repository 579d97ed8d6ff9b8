//! Pre-deployment risk profiling for facilities that have not adopted yet.
//!
//! The score is a plain sum of points for each factor a facility trips. It is
//! not capped: five factors at the default weights reach exactly 100, and
//! recalibrated tables may go higher. Tiers are open-ended at the top.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzers::yvs::{facility_score, ScoringWeights};
use crate::error::ConfigError;
use crate::facility::Facility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    LowYvs,
    HighTurnTime,
    ComplexLayout,
    PaperHeavy,
    HighVolume,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::LowYvs,
        RiskFactor::HighTurnTime,
        RiskFactor::ComplexLayout,
        RiskFactor::PaperHeavy,
        RiskFactor::HighVolume,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }
}

/// Lower bounds of the MEDIUM, HIGH and CRITICAL tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTierCutoffs {
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl Default for RiskTierCutoffs {
    fn default() -> Self {
        Self {
            medium: 25,
            high: 45,
            critical: 65,
        }
    }
}

impl RiskTierCutoffs {
    pub fn tier_for(&self, score: u32) -> RiskTier {
        if score >= self.critical {
            RiskTier::Critical
        } else if score >= self.high {
            RiskTier::High
        } else if score >= self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

/// `weeks = base_weeks + ceil(score / points_per_week)`,
/// `engineers = base_engineers + score / points_per_engineer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceModel {
    pub base_weeks: u32,
    pub points_per_week: u32,
    pub base_engineers: u32,
    pub points_per_engineer: u32,
}

impl Default for ResourceModel {
    fn default() -> Self {
        Self {
            base_weeks: 4,
            points_per_week: 10,
            base_engineers: 1,
            points_per_engineer: 35,
        }
    }
}

impl ResourceModel {
    pub fn implementation_weeks(&self, score: u32) -> u32 {
        self.base_weeks
            .saturating_add(score.div_ceil(self.points_per_week.max(1)))
    }

    pub fn field_engineers(&self, score: u32) -> u32 {
        self.base_engineers
            .saturating_add(score / self.points_per_engineer.max(1))
    }
}

/// Raises `competitor` when every factor in `requires` is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorRule {
    pub requires: Vec<RiskFactor>,
    pub competitor: String,
}

impl CompetitorRule {
    fn new(requires: &[RiskFactor], competitor: &str) -> Self {
        Self {
            requires: requires.to_vec(),
            competitor: competitor.to_string(),
        }
    }
}

/// Every tunable number and table the profiler uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRules {
    pub low_yvs_below: f64,
    pub high_turn_time_above_min: f64,
    pub complex_layout_min_gates: u32,
    pub paper_heavy_above: u32,
    pub high_volume_above: u32,
    pub points: BTreeMap<RiskFactor, u32>,
    pub tiers: RiskTierCutoffs,
    pub resources: ResourceModel,
    pub competitors: Vec<CompetitorRule>,
}

impl Default for RiskRules {
    fn default() -> Self {
        let points = BTreeMap::from([
            (RiskFactor::LowYvs, 25),
            (RiskFactor::HighTurnTime, 20),
            (RiskFactor::ComplexLayout, 20),
            (RiskFactor::PaperHeavy, 20),
            (RiskFactor::HighVolume, 15),
        ]);

        let competitors = vec![
            CompetitorRule::new(&[RiskFactor::PaperHeavy], "paper-centric"),
            CompetitorRule::new(&[RiskFactor::HighVolume], "volume-focused"),
            CompetitorRule::new(
                &[RiskFactor::ComplexLayout, RiskFactor::HighTurnTime],
                "gate-automation",
            ),
            CompetitorRule::new(&[RiskFactor::LowYvs], "low-cost-entry"),
        ];

        Self {
            low_yvs_below: 50.0,
            high_turn_time_above_min: 45.0,
            complex_layout_min_gates: 4,
            paper_heavy_above: 10,
            high_volume_above: 60,
            points,
            tiers: RiskTierCutoffs::default(),
            resources: ResourceModel::default(),
            competitors,
        }
    }
}

impl RiskRules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tiers;
        if !(t.medium < t.high && t.high < t.critical) {
            return Err(ConfigError::UnorderedThresholds("risk tier"));
        }
        if self.resources.points_per_week == 0 {
            return Err(ConfigError::NotPositive("points_per_week"));
        }
        if self.resources.points_per_engineer == 0 {
            return Err(ConfigError::NotPositive("points_per_engineer"));
        }
        Ok(())
    }

    pub fn points_for(&self, factor: RiskFactor) -> u32 {
        self.points.get(&factor).copied().unwrap_or(0)
    }

    /// Evaluates every factor condition against one facility.
    pub fn factors(&self, facility: &Facility, yvs: f64) -> RiskFactors {
        RiskFactors {
            low_yvs: yvs < self.low_yvs_below,
            high_turn_time: facility.avg_turn_time_min > self.high_turn_time_above_min,
            complex_layout: facility.gate_nodes >= self.complex_layout_min_gates,
            paper_heavy: facility.paper_docs_per_day > self.paper_heavy_above,
            high_volume: facility.trucks_per_day > self.high_volume_above,
        }
    }

    /// Competitors raised by `factors`, in table order, without repeats.
    pub fn competitor_threats(&self, factors: &RiskFactors) -> Vec<String> {
        let mut threats: Vec<String> = Vec::new();
        for rule in &self.competitors {
            let matched = !rule.requires.is_empty() && rule.requires.iter().all(|f| factors.has(*f));
            if matched && !threats.contains(&rule.competitor) {
                threats.push(rule.competitor.clone());
            }
        }
        threats
    }
}

/// Which conditions a facility trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskFactors {
    pub low_yvs: bool,
    pub high_turn_time: bool,
    pub complex_layout: bool,
    pub paper_heavy: bool,
    pub high_volume: bool,
}

impl RiskFactors {
    pub fn has(&self, factor: RiskFactor) -> bool {
        match factor {
            RiskFactor::LowYvs => self.low_yvs,
            RiskFactor::HighTurnTime => self.high_turn_time,
            RiskFactor::ComplexLayout => self.complex_layout,
            RiskFactor::PaperHeavy => self.paper_heavy,
            RiskFactor::HighVolume => self.high_volume,
        }
    }

    pub fn active(&self) -> Vec<RiskFactor> {
        RiskFactor::ALL.into_iter().filter(|f| self.has(*f)).collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskProfile {
    pub facility_id: String,
    pub facility_name: String,
    pub region: String,
    pub yvs: f64,
    pub score: u32,
    pub tier: RiskTier,
    pub factors: RiskFactors,
    pub competitor_threats: Vec<String>,
    pub field_engineers: u32,
    pub implementation_weeks: u32,
}

impl RiskProfile {
    pub fn engineer_weeks(&self) -> u32 {
        self.field_engineers.saturating_mul(self.implementation_weeks)
    }
}

/// Builds the risk profile of a single facility.
///
/// Returns `None` once the facility has adopted: risk describes how hard the
/// rollout will be, not how it is going.
pub fn profile(
    facility: &Facility,
    weights: &ScoringWeights,
    rules: &RiskRules,
) -> Option<RiskProfile> {
    if facility.is_adopted() {
        return None;
    }

    let yvs = facility_score(facility, weights);
    let factors = rules.factors(facility, yvs);
    // points come from config and may be arbitrarily large
    let score = factors
        .active()
        .into_iter()
        .fold(0u32, |acc, f| acc.saturating_add(rules.points_for(f)));

    Some(RiskProfile {
        facility_id: facility.id.clone(),
        facility_name: facility.name.clone(),
        region: facility.region.clone(),
        yvs,
        score,
        tier: rules.tiers.tier_for(score),
        competitor_threats: rules.competitor_threats(&factors),
        factors,
        field_engineers: rules.resources.field_engineers(score),
        implementation_weeks: rules.resources.implementation_weeks(score),
    })
}

/// Profiles every pending facility, keeping input order.
pub fn profile_pending<'a, I>(
    facilities: I,
    weights: &ScoringWeights,
    rules: &RiskRules,
) -> Vec<RiskProfile>
where
    I: IntoIterator<Item = &'a Facility>,
{
    facilities
        .into_iter()
        .filter_map(|f| profile(f, weights, rules))
        .collect()
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskSummary {
    pub profiled: usize,
    pub by_tier: BTreeMap<RiskTier, usize>,
    pub competitor_exposure: BTreeMap<String, usize>,
    pub total_field_engineers: u32,
    pub total_engineer_weeks: u32,
    pub max_score: u32,
}

pub fn summarize(profiles: &[RiskProfile]) -> RiskSummary {
    let mut summary = RiskSummary {
        profiled: profiles.len(),
        ..Default::default()
    };

    for p in profiles {
        *summary.by_tier.entry(p.tier).or_default() += 1;
        for c in &p.competitor_threats {
            *summary.competitor_exposure.entry(c.clone()).or_default() += 1;
        }
        summary.total_field_engineers = summary.total_field_engineers.saturating_add(p.field_engineers);
        summary.total_engineer_weeks = summary.total_engineer_weeks.saturating_add(p.engineer_weeks());
        summary.max_score = summary.max_score.max(p.score);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::AdoptionStatus;

    fn pending(id: &str) -> Facility {
        Facility {
            id: id.into(),
            // 0.5 * 80 = 40 YVS with no trailers or gates
            paved_area_pct: 80.0,
            ..Default::default()
        }
    }

    fn run(facility: &Facility) -> RiskProfile {
        profile(facility, &ScoringWeights::default(), &RiskRules::default()).unwrap()
    }

    #[test]
    fn test_points_add_up_per_factor() {
        let facility = Facility {
            avg_turn_time_min: 50.0,
            paper_docs_per_day: 12,
            ..pending("f1")
        };
        let p = run(&facility);

        assert!((p.yvs - 40.0).abs() < 1e-9);
        assert_eq!(p.score, 65);
        assert_eq!(
            p.factors,
            RiskFactors {
                low_yvs: true,
                high_turn_time: true,
                complex_layout: false,
                paper_heavy: true,
                high_volume: false,
            }
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        let facility = Facility {
            paved_area_pct: 100.0,
            avg_turn_time_min: 45.0,
            paper_docs_per_day: 10,
            trucks_per_day: 60,
            gate_nodes: 3,
            ..pending("edge")
        };
        let p = run(&facility);
        assert_eq!(p.score, 0);
        assert_eq!(p.tier, RiskTier::Low);
        assert!(p.competitor_threats.is_empty());
    }

    #[test]
    fn test_all_factors_reach_one_hundred() {
        let facility = Facility {
            paved_area_pct: 0.0,
            gate_nodes: 4,
            avg_turn_time_min: 70.0,
            paper_docs_per_day: 40,
            trucks_per_day: 120,
            ..pending("worst")
        };
        let p = run(&facility);
        // gate term alone: 0.2 * 80 = 16, still low
        assert_eq!(p.score, 100);
        assert_eq!(p.tier, RiskTier::Critical);
        assert_eq!(
            p.competitor_threats,
            vec!["paper-centric", "volume-focused", "gate-automation", "low-cost-entry"]
        );
    }

    #[test]
    fn test_adopted_facility_has_no_profile() {
        let facility = Facility {
            adoption_status: AdoptionStatus::Pilot,
            ..pending("live")
        };
        assert!(profile(&facility, &ScoringWeights::default(), &RiskRules::default()).is_none());
    }

    #[test]
    fn test_tier_mapping_is_monotonic() {
        let cutoffs = RiskTierCutoffs::default();
        let mut prev = RiskTier::Low;
        for score in 0..=120 {
            let tier = cutoffs.tier_for(score);
            assert!(tier >= prev);
            prev = tier;
        }
        assert_eq!(cutoffs.tier_for(24), RiskTier::Low);
        assert_eq!(cutoffs.tier_for(25), RiskTier::Medium);
        assert_eq!(cutoffs.tier_for(45), RiskTier::High);
        assert_eq!(cutoffs.tier_for(65), RiskTier::Critical);
    }

    #[test]
    fn test_resources_grow_with_score() {
        let model = ResourceModel::default();
        assert_eq!(model.implementation_weeks(0), 4);
        assert_eq!(model.implementation_weeks(65), 11);
        assert_eq!(model.field_engineers(34), 1);
        assert_eq!(model.field_engineers(65), 2);
        assert_eq!(model.field_engineers(100), 3);

        for score in 0..120 {
            assert!(model.implementation_weeks(score + 1) >= model.implementation_weeks(score));
            assert!(model.field_engineers(score + 1) >= model.field_engineers(score));
        }
    }

    #[test]
    fn test_profile_is_deterministic() {
        let facility = Facility {
            trucks_per_day: 90,
            ..pending("same")
        };
        let a = run(&facility);
        let b = run(&facility);
        assert_eq!(a.score, b.score);
        assert_eq!(a.field_engineers, b.field_engineers);
        assert_eq!(a.implementation_weeks, b.implementation_weeks);
        assert_eq!(a.competitor_threats, b.competitor_threats);
    }

    #[test]
    fn test_summary_counts_tiers_and_engineer_weeks() {
        let facilities = vec![
            pending("a"),
            Facility {
                avg_turn_time_min: 50.0,
                paper_docs_per_day: 12,
                ..pending("b")
            },
            Facility {
                adoption_status: AdoptionStatus::Full,
                ..pending("c")
            },
        ];
        let profiles =
            profile_pending(&facilities, &ScoringWeights::default(), &RiskRules::default());
        assert_eq!(profiles.len(), 2);

        let summary = summarize(&profiles);
        assert_eq!(summary.by_tier.get(&RiskTier::Medium), Some(&1));
        assert_eq!(summary.by_tier.get(&RiskTier::Critical), Some(&1));
        // a: 25 pts -> 1 engineer x 7 weeks; b: 65 pts -> 2 engineers x 11 weeks
        assert_eq!(summary.total_engineer_weeks, 7 + 22);
        assert_eq!(summary.competitor_exposure.get("low-cost-entry"), Some(&2));
        assert_eq!(summary.max_score, 65);
    }

    #[test]
    fn test_tier_label_matches_serialized_form() {
        for tier in [RiskTier::Low, RiskTier::Medium, RiskTier::High, RiskTier::Critical] {
            assert_eq!(serde_json::to_value(tier).unwrap(), tier.as_str());
        }
    }

    #[test]
    fn test_huge_points_saturate() {
        let mut rules = RiskRules::default();
        for points in rules.points.values_mut() {
            *points = 4_000_000_000;
        }
        let facility = Facility {
            paved_area_pct: 0.0,
            gate_nodes: 4,
            avg_turn_time_min: 70.0,
            paper_docs_per_day: 40,
            trucks_per_day: 120,
            ..pending("worst")
        };
        let p = profile(&facility, &ScoringWeights::default(), &rules).unwrap();
        assert_eq!(p.score, u32::MAX);
        assert_eq!(p.tier, RiskTier::Critical);
        assert_eq!(p.engineer_weeks(), u32::MAX);

        let summary = summarize(&[p.clone(), p]);
        assert_eq!(summary.total_engineer_weeks, u32::MAX);
        assert_eq!(summary.max_score, u32::MAX);
    }

    #[test]
    fn test_unordered_cutoffs_rejected() {
        let rules = RiskRules {
            tiers: RiskTierCutoffs {
                medium: 50,
                high: 40,
                critical: 65,
            },
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }
}
