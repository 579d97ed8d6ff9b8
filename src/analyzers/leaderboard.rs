//! Sorted and paginated views of the roster.
//!
//! Rankings are descending by the chosen key. Ties fall back to facility id
//! ascending, so the same roster always ranks the same way.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::types::RegionStanding;
use crate::analyzers::utility::{mean, pct};
use crate::analyzers::yvs::{facility_score, ScoringWeights};
use crate::error::PageError;
use crate::facility::Facility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Points,
    Streak,
    Roi,
    Improvement,
    Yvs,
}

impl SortKey {
    pub fn value(&self, facility: &Facility, weights: &ScoringWeights) -> f64 {
        match self {
            SortKey::Points => facility.total_points as f64,
            SortKey::Streak => facility.streak_days as f64,
            SortKey::Roi => facility.projected_annual_roi,
            SortKey::Improvement => facility.turn_time_improvement_pct,
            SortKey::Yvs => facility_score(facility, weights),
        }
    }
}

/// Which facilities take part in a ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Scope {
    /// Only facilities that have started adopting.
    #[default]
    Active,
    All,
}

impl Scope {
    fn admits(&self, facility: &Facility) -> bool {
        match self {
            Scope::Active => facility.is_adopted(),
            Scope::All => true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ranked<'a> {
    pub rank: usize,
    pub value: f64,
    pub facility: &'a Facility,
}

pub fn rank<'a>(
    facilities: &'a [Facility],
    key: SortKey,
    scope: Scope,
    weights: &ScoringWeights,
) -> Vec<Ranked<'a>> {
    let mut rows: Vec<(f64, &Facility)> = facilities
        .iter()
        .filter(|f| scope.admits(f))
        .map(|f| (key.value(f, weights), f))
        .collect();

    rows.sort_by(|(va, fa), (vb, fb)| vb.total_cmp(va).then_with(|| fa.id.cmp(&fb.id)));

    rows.into_iter()
        .enumerate()
        .map(|(i, (value, facility))| Ranked {
            rank: i + 1,
            value,
            facility,
        })
        .collect()
}

/// One page of a longer list. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slices `items` into page `page` of size `page_size`.
///
/// The last page may be partial; a page past the end comes back empty.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, page: usize) -> Result<Page<T>, PageError> {
    if page_size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    if page == 0 {
        return Err(PageError::ZeroPage);
    }

    let total_items = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);

    Ok(Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages: total_items.div_ceil(page_size),
    })
}

/// Groups the roster by region and ranks regions by total points.
///
/// Always spans every facility in `facilities`, pending ones included, since
/// the adoption rate needs them in the denominator.
pub fn regional_leaderboard(
    facilities: &[Facility],
    weights: &ScoringWeights,
) -> Vec<RegionStanding> {
    let mut groups: BTreeMap<&str, Vec<&Facility>> = BTreeMap::new();
    for f in facilities {
        groups.entry(f.region.as_str()).or_default().push(f);
    }

    let mut standings: Vec<RegionStanding> = groups
        .into_iter()
        .map(|(region, members)| {
            let adopted = members.iter().filter(|f| f.is_adopted()).count();
            let scores: Vec<f64> = members.iter().map(|f| facility_score(f, weights)).collect();
            RegionStanding {
                rank: 0,
                region: region.to_string(),
                facilities: members.len(),
                adopted,
                total_points: members.iter().map(|f| f.total_points).sum(),
                total_annual_roi: members.iter().map(|f| f.projected_annual_roi).sum(),
                adoption_rate: pct(adopted, members.len()),
                avg_yvs: mean(&scores),
            }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.region.cmp(&b.region))
    });
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = i + 1;
    }

    standings
}
