//! The facility roster and the read-only repository interface over it.
//!
//! Every analyzer takes facilities as an explicit argument; nothing reads a
//! global. [`Roster`] is the in-memory implementation seeded at startup.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::RosterError;
use crate::facility::{AdoptionStatus, Coordinates, Facility};
use crate::parser::{check_roster, parse_roster};

static SEED_ROSTER: &[u8] = include_bytes!("../data/roster.json");

/// Selects a subset of the roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub status: Option<AdoptionStatus>,
    pub region: Option<String>,
    /// Drops facilities that have not started adopting.
    pub active_only: bool,
}

impl RosterFilter {
    pub fn matches(&self, facility: &Facility) -> bool {
        if self.active_only && !facility.is_adopted() {
            return false;
        }
        if let Some(status) = self.status {
            if facility.adoption_status != status {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if !facility.region.eq_ignore_ascii_case(region) {
                return false;
            }
        }
        true
    }
}

/// Read access to an ordered set of facilities.
pub trait FacilityRepository {
    /// Full scan in roster order.
    fn all(&self) -> &[Facility];

    fn get(&self, id: &str) -> Option<&Facility> {
        self.all().iter().find(|f| f.id == id)
    }

    fn by_status(&self, status: AdoptionStatus) -> Vec<&Facility> {
        self.all()
            .iter()
            .filter(|f| f.adoption_status == status)
            .collect()
    }

    fn by_region(&self, region: &str) -> Vec<&Facility> {
        self.all()
            .iter()
            .filter(|f| f.region.eq_ignore_ascii_case(region))
            .collect()
    }

    fn filter(&self, filter: &RosterFilter) -> Vec<&Facility> {
        self.all().iter().filter(|f| filter.matches(f)).collect()
    }
}

/// In-memory roster.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    facilities: Vec<Facility>,
}

impl Roster {
    pub fn new(facilities: Vec<Facility>) -> Result<Self, RosterError> {
        check_roster(&facilities)?;
        Ok(Self { facilities })
    }

    /// The roster bundled with the crate.
    pub fn seeded() -> Result<Self> {
        let facilities = parse_roster(SEED_ROSTER).context("parsing bundled roster")?;
        debug!(count = facilities.len(), "Loaded bundled roster");
        Ok(Self { facilities })
    }

    /// Reads a roster from a JSON file.
    pub fn load(path: &str) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading roster '{path}'"))?;
        let facilities = parse_roster(&bytes).with_context(|| format!("parsing roster '{path}'"))?;
        info!(path, count = facilities.len(), "Loaded roster");
        Ok(Self { facilities })
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Facility, RosterError> {
        self.facilities
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| RosterError::UnknownFacility(id.to_string()))
    }

    /// Moves a facility to new coordinates.
    ///
    /// Both components are validated first and replaced together, so a
    /// rejected relocation leaves the old position untouched.
    pub fn relocate(&mut self, id: &str, to: Coordinates) -> Result<Coordinates, RosterError> {
        to.validate()?;
        let facility = self.get_mut(id)?;
        let previous = std::mem::replace(&mut facility.coordinates, to);
        info!(facility_id = id, from = %previous, to = %to, "Facility relocated");
        Ok(previous)
    }

    /// Moves a facility forward in the adoption lifecycle.
    ///
    /// Staying at the current status is allowed; going backwards is not.
    pub fn advance_status(&mut self, id: &str, to: AdoptionStatus) -> Result<(), RosterError> {
        let facility = self.get_mut(id)?;
        if to < facility.adoption_status {
            return Err(RosterError::StatusRegression {
                id: id.to_string(),
                from: facility.adoption_status,
                to,
            });
        }
        facility.adoption_status = to;
        Ok(())
    }
}

impl FacilityRepository for Roster {
    fn all(&self) -> &[Facility] {
        &self.facilities
    }
}
