//! Result types produced by the analyzers and written into reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::risk::{RiskProfile, RiskSummary};
use crate::analyzers::waves::WavePriority;
use crate::facility::AdoptionStatus;
use crate::scorecard::ScoreCard;

/// Facility counts per YVS tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub whale: usize,
    pub standard: usize,
    pub low: usize,
}

/// Network-wide snapshot over a roster or a filtered subset of it.
///
/// Every field is zero for an empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub total_facilities: usize,
    pub adopted_facilities: usize,
    pub pending_facilities: usize,
    pub adoption_rate: f64,
    pub total_annual_roi: f64,
    pub avg_turn_time_improvement: f64,
    pub total_points: u64,
    pub total_trucks_per_day: u64,
    pub avg_yvs: f64,
    pub total_engineer_weeks: u32,
    pub tiers: TierCounts,
    pub by_status: BTreeMap<AdoptionStatus, usize>,
}

/// One row of the regional leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStanding {
    pub rank: usize,
    pub region: String,
    pub facilities: usize,
    pub adopted: usize,
    pub total_points: u64,
    pub total_annual_roi: f64,
    pub adoption_rate: f64,
    pub avg_yvs: f64,
}

/// A regional batch of pending facilities scheduled as one rollout step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentWave {
    pub wave: usize,
    pub region: String,
    pub facility_ids: Vec<String>,
    pub facility_count: usize,
    pub total_annual_roi: f64,
    pub total_dock_doors: u64,
    pub avg_yvs: f64,
    pub total_trucks_per_day: u64,
    pub implementation_cost: f64,
    pub roi_efficiency: f64,
    pub priority: WavePriority,
    pub duration_weeks: u32,
    pub start_week: u32,
    pub end_week: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Pace needed to finish every pending facility inside the target horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeploymentVelocity {
    pub target_weeks: u32,
    pub facilities_per_week: f64,
    pub roi_per_week: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentPlan {
    pub generated_on: NaiveDate,
    pub waves: Vec<DeploymentWave>,
    pub remaining_facilities: usize,
    pub remaining_annual_roi: f64,
    pub total_weeks: u32,
    pub velocity: DeploymentVelocity,
}

/// Everything the `report` command publishes as `dashboard.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub network: NetworkStats,
    pub top_targets: Vec<ScoreCard>,
    pub regions: Vec<RegionStanding>,
    pub risk_summary: RiskSummary,
    pub risk_profiles: Vec<RiskProfile>,
    pub deployment_plan: DeploymentPlan,
}
