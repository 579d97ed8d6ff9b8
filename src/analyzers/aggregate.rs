use crate::analyzers::grade::ScoreTier;
use crate::analyzers::risk;
use crate::analyzers::types::NetworkStats;
use crate::analyzers::utility::{mean, pct};
use crate::analyzers::yvs::facility_score;
use crate::config::EngineConfig;
use crate::facility::Facility;

/// Reduces a set of facilities into a [`NetworkStats`] snapshot.
///
/// Accepts any iterator of facilities so callers can pass the whole roster or
/// a filtered view. Averages are taken over the facilities passed in; an empty
/// input produces a zeroed snapshot.
pub fn network_stats<'a, I>(facilities: I, config: &EngineConfig) -> NetworkStats
where
    I: IntoIterator<Item = &'a Facility>,
{
    let mut stats = NetworkStats::default();
    let mut scores = Vec::new();
    let mut improvements = Vec::new();

    for f in facilities {
        stats.total_facilities += 1;
        *stats.by_status.entry(f.adoption_status).or_default() += 1;

        if f.is_adopted() {
            stats.adopted_facilities += 1;
        } else if let Some(profile) = risk::profile(f, &config.scoring, &config.risk) {
            stats.total_engineer_weeks = stats.total_engineer_weeks.saturating_add(profile.engineer_weeks());
        }

        stats.total_annual_roi += f.projected_annual_roi;
        stats.total_points = stats.total_points.saturating_add(f.total_points);
        stats.total_trucks_per_day += u64::from(f.trucks_per_day);
        improvements.push(f.turn_time_improvement_pct);

        let yvs = facility_score(f, &config.scoring);
        match ScoreTier::from_score(yvs) {
            ScoreTier::Whale => stats.tiers.whale += 1,
            ScoreTier::Standard => stats.tiers.standard += 1,
            ScoreTier::Low => stats.tiers.low += 1,
        }
        scores.push(yvs);
    }

    stats.pending_facilities = stats.total_facilities - stats.adopted_facilities;
    stats.adoption_rate = pct(stats.adopted_facilities, stats.total_facilities);
    stats.avg_turn_time_improvement = mean(&improvements);
    stats.avg_yvs = mean(&scores);

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::AdoptionStatus;

    fn facility(id: &str, status: AdoptionStatus, paved: f64, roi: f64, points: u64) -> Facility {
        Facility {
            id: id.into(),
            adoption_status: status,
            paved_area_pct: paved,
            projected_annual_roi: roi,
            total_points: points,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = network_stats(&Vec::<Facility>::new(), &EngineConfig::default());

        assert_eq!(stats.total_facilities, 0);
        assert_eq!(stats.adoption_rate, 0.0);
        assert_eq!(stats.total_annual_roi, 0.0);
        assert_eq!(stats.avg_yvs, 0.0);
        assert_eq!(stats.avg_turn_time_improvement, 0.0);
        assert!(!stats.adoption_rate.is_nan());
    }

    #[test]
    fn test_counts_and_sums() {
        let facilities = vec![
            Facility {
                turn_time_improvement_pct: 30.0,
                trucks_per_day: 40,
                ..facility("a", AdoptionStatus::Champion, 100.0, 200_000.0, 900)
            },
            Facility {
                turn_time_improvement_pct: 10.0,
                trucks_per_day: 20,
                ..facility("b", AdoptionStatus::Pilot, 60.0, 100_000.0, 300)
            },
            facility("c", AdoptionStatus::NotStarted, 80.0, 50_000.0, 0),
            facility("d", AdoptionStatus::NotStarted, 20.0, 50_000.0, 0),
        ];
        let stats = network_stats(&facilities, &EngineConfig::default());

        assert_eq!(stats.total_facilities, 4);
        assert_eq!(stats.adopted_facilities, 2);
        assert_eq!(stats.pending_facilities, 2);
        assert_eq!(stats.adoption_rate, 50.0);
        assert_eq!(stats.total_annual_roi, 400_000.0);
        assert_eq!(stats.total_points, 1200);
        assert_eq!(stats.total_trucks_per_day, 60);
        assert_eq!(stats.avg_turn_time_improvement, 10.0);
        // yvs: 50, 30, 40, 10
        assert!((stats.avg_yvs - 32.5).abs() < 1e-9);
        assert_eq!(stats.tiers.standard, 1);
        assert_eq!(stats.tiers.low, 3);
        assert_eq!(stats.by_status.get(&AdoptionStatus::NotStarted), Some(&2));
        // c and d both trip low_yvs only: 1 engineer x 7 weeks each
        assert_eq!(stats.total_engineer_weeks, 14);
    }

    #[test]
    fn test_oversized_totals_saturate() {
        let facilities = vec![
            facility("a", AdoptionStatus::Full, 50.0, 0.0, u64::MAX),
            facility("b", AdoptionStatus::Full, 50.0, 0.0, 10),
        ];
        let stats = network_stats(&facilities, &EngineConfig::default());
        assert_eq!(stats.total_points, u64::MAX);
    }

    #[test]
    fn test_filtered_subset() {
        let facilities = vec![
            facility("a", AdoptionStatus::Full, 90.0, 10.0, 5),
            facility("b", AdoptionStatus::NotStarted, 90.0, 20.0, 7),
        ];
        let adopted = network_stats(
            facilities.iter().filter(|f| f.is_adopted()),
            &EngineConfig::default(),
        );
        assert_eq!(adopted.total_facilities, 1);
        assert_eq!(adopted.adoption_rate, 100.0);
        assert_eq!(adopted.total_points, 5);
    }
}
