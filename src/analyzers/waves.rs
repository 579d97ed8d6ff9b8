//! Deployment wave planning.
//!
//! Pending facilities are grouped by region, each region becomes one wave,
//! and waves run back to back in descending order of ROI efficiency
//! (projected annual ROI per dollar of implementation cost).

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analyzers::types::{DeploymentPlan, DeploymentVelocity, DeploymentWave};
use crate::analyzers::utility::{mean, ratio};
use crate::analyzers::yvs::{facility_score, ScoringWeights};
use crate::error::ConfigError;
use crate::facility::Facility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WavePriority {
    Critical,
    High,
    Standard,
    Queue,
}

impl WavePriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            WavePriority::Critical => "CRITICAL",
            WavePriority::High => "HIGH",
            WavePriority::Standard => "STANDARD",
            WavePriority::Queue => "QUEUE",
        }
    }
}

/// Cost, capacity and priority constants for wave planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavePolicy {
    pub cost_per_facility: f64,
    pub facilities_per_week: u32,
    pub target_weeks: u32,
    pub critical_efficiency: f64,
    pub high_efficiency: f64,
    pub standard_efficiency: f64,
}

impl Default for WavePolicy {
    fn default() -> Self {
        Self {
            cost_per_facility: 48_000.0,
            facilities_per_week: 5,
            target_weeks: 52,
            critical_efficiency: 3.0,
            high_efficiency: 2.0,
            standard_efficiency: 1.5,
        }
    }
}

impl WavePolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.facilities_per_week == 0 {
            return Err(ConfigError::NotPositive("facilities_per_week"));
        }
        if self.target_weeks == 0 {
            return Err(ConfigError::NotPositive("target_weeks"));
        }
        if self.cost_per_facility <= 0.0 {
            return Err(ConfigError::NotPositive("cost_per_facility"));
        }
        if !(self.standard_efficiency < self.high_efficiency
            && self.high_efficiency < self.critical_efficiency)
        {
            return Err(ConfigError::UnorderedThresholds("wave efficiency"));
        }
        Ok(())
    }

    pub fn priority_for(&self, efficiency: f64) -> WavePriority {
        match efficiency {
            e if e >= self.critical_efficiency => WavePriority::Critical,
            e if e >= self.high_efficiency => WavePriority::High,
            e if e >= self.standard_efficiency => WavePriority::Standard,
            _ => WavePriority::Queue,
        }
    }

    pub fn duration_weeks(&self, facility_count: usize) -> u32 {
        let per_week = self.facilities_per_week.max(1) as usize;
        facility_count.div_ceil(per_week) as u32
    }
}

fn date_for_week(today: NaiveDate, week: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(week) * 7))
        .unwrap_or(NaiveDate::MAX)
}

/// Builds the rollout plan for every `not_started` facility in `facilities`.
///
/// Regions without a pending facility produce no wave. `today` anchors the
/// calendar: week `n` lands on `today + 7n` days.
pub fn plan_waves<'a, I>(
    facilities: I,
    weights: &ScoringWeights,
    policy: &WavePolicy,
    today: NaiveDate,
) -> DeploymentPlan
where
    I: IntoIterator<Item = &'a Facility>,
{
    let mut groups: BTreeMap<&str, Vec<&Facility>> = BTreeMap::new();
    for f in facilities.into_iter().filter(|f| f.is_pending()) {
        groups.entry(f.region.as_str()).or_default().push(f);
    }

    let mut waves: Vec<DeploymentWave> = groups
        .into_iter()
        .map(|(region, members)| {
            let count = members.len();
            let total_roi: f64 = members.iter().map(|f| f.projected_annual_roi).sum();
            let cost = count as f64 * policy.cost_per_facility;
            let efficiency = ratio(total_roi, cost);
            let scores: Vec<f64> = members.iter().map(|f| facility_score(f, weights)).collect();

            DeploymentWave {
                wave: 0,
                region: region.to_string(),
                facility_ids: members.iter().map(|f| f.id.clone()).collect(),
                facility_count: count,
                total_annual_roi: total_roi,
                total_dock_doors: members.iter().map(|f| u64::from(f.dock_doors)).sum(),
                avg_yvs: mean(&scores),
                total_trucks_per_day: members.iter().map(|f| u64::from(f.trucks_per_day)).sum(),
                implementation_cost: cost,
                roi_efficiency: efficiency,
                priority: policy.priority_for(efficiency),
                duration_weeks: policy.duration_weeks(count),
                start_week: 0,
                end_week: 0,
                start_date: today,
                end_date: today,
            }
        })
        .collect();

    waves.sort_by(|a, b| {
        b.roi_efficiency
            .total_cmp(&a.roi_efficiency)
            .then_with(|| a.region.cmp(&b.region))
    });

    let mut elapsed = 0u32;
    for (i, wave) in waves.iter_mut().enumerate() {
        wave.wave = i + 1;
        wave.start_week = elapsed + 1;
        wave.end_week = elapsed + wave.duration_weeks;
        wave.start_date = date_for_week(today, wave.start_week);
        wave.end_date = date_for_week(today, wave.end_week);
        elapsed += wave.duration_weeks;
    }

    let remaining_facilities: usize = waves.iter().map(|w| w.facility_count).sum();
    let remaining_annual_roi: f64 = waves.iter().map(|w| w.total_annual_roi).sum();
    let target = f64::from(policy.target_weeks);

    DeploymentPlan {
        generated_on: today,
        waves,
        remaining_facilities,
        remaining_annual_roi,
        total_weeks: elapsed,
        velocity: DeploymentVelocity {
            target_weeks: policy.target_weeks,
            facilities_per_week: ratio(remaining_facilities as f64, target),
            roi_per_week: ratio(remaining_annual_roi, target),
        },
    }
}
