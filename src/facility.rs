//! Facility records: the rows of the roster every computation reads from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RosterError;

/// Rollout stage of the yard product at a facility.
///
/// Variants are declared in lifecycle order so the derived `Ord` doubles as
/// the "only moves forward" check.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum AdoptionStatus {
    #[default]
    NotStarted,
    Pilot,
    Partial,
    Full,
    Champion,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::NotStarted => "not_started",
            AdoptionStatus::Pilot => "pilot",
            AdoptionStatus::Partial => "partial",
            AdoptionStatus::Full => "full",
            AdoptionStatus::Champion => "champion",
        }
    }

    /// Everything past `NotStarted` counts as adopted.
    pub fn is_adopted(&self) -> bool {
        *self != AdoptionStatus::NotStarted
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks both components are finite and inside the WGS84 ranges.
    pub fn validate(&self) -> Result<(), RosterError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lng_ok = self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(RosterError::InvalidCoordinates {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// One logistics yard as stored in the roster.
///
/// Scores, risk profiles and wave assignments are never stored here; they are
/// recomputed from these attributes on every read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub location: String,
    pub region: String,

    #[serde(flatten)]
    pub coordinates: Coordinates,

    // physical
    pub paved_area_pct: f64,
    pub dock_doors: u32,
    pub yard_spots: u32,
    pub gate_nodes: u32,
    pub trailers_detected: u32,
    pub trucks_detected: u32,

    // operational
    pub trucks_per_day: u32,
    pub avg_turn_time_min: f64,
    pub turn_time_improvement_pct: f64,
    pub ghost_searches_per_day: u32,
    pub paper_docs_per_day: u32,

    // adoption
    pub has_yes: bool,
    pub has_yms: bool,
    pub adoption_status: AdoptionStatus,
    pub go_live_date: Option<NaiveDate>,

    // financials
    pub detention_savings_monthly: f64,
    pub labor_savings_monthly: f64,
    pub projected_annual_roi: f64,

    // gamification
    pub total_points: u64,
    pub streak_days: u32,
}

impl Facility {
    pub fn is_adopted(&self) -> bool {
        self.adoption_status.is_adopted()
    }

    pub fn is_pending(&self) -> bool {
        !self.is_adopted()
    }

    /// Text sent to a geocoder when checking this facility's coordinates.
    pub fn geocode_query(&self) -> String {
        if self.location.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.location)
        }
    }

    /// Rejects attribute values the scoring engine cannot interpret.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.id.trim().is_empty() {
            return Err(RosterError::MissingId {
                name: self.name.clone(),
            });
        }
        if !self.paved_area_pct.is_finite() || !(0.0..=100.0).contains(&self.paved_area_pct) {
            return Err(RosterError::InvalidPavedArea {
                id: self.id.clone(),
                value: self.paved_area_pct,
            });
        }
        self.coordinates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_order_follows_lifecycle() {
        assert!(AdoptionStatus::NotStarted < AdoptionStatus::Pilot);
        assert!(AdoptionStatus::Pilot < AdoptionStatus::Partial);
        assert!(AdoptionStatus::Partial < AdoptionStatus::Full);
        assert!(AdoptionStatus::Full < AdoptionStatus::Champion);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AdoptionStatus::NotStarted).unwrap();
        assert_eq!(json, "\"not_started\"");
        let parsed: AdoptionStatus = serde_json::from_str("\"champion\"").unwrap();
        assert_eq!(parsed, AdoptionStatus::Champion);
    }

    #[test]
    fn test_validate_rejects_paved_area_out_of_range() {
        let facility = Facility {
            id: "f1".into(),
            paved_area_pct: 120.0,
            ..Default::default()
        };
        assert!(matches!(
            facility.validate(),
            Err(RosterError::InvalidPavedArea { .. })
        ));

        let negative = Facility {
            id: "f2".into(),
            paved_area_pct: -5.0,
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_coordinates() {
        let facility = Facility {
            id: "f1".into(),
            coordinates: Coordinates::new(95.0, 10.0),
            ..Default::default()
        };
        assert!(matches!(
            facility.validate(),
            Err(RosterError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_geocode_query_joins_name_and_location() {
        let facility = Facility {
            id: "f1".into(),
            name: "Amazon ATL4".into(),
            location: "Union City, GA".into(),
            ..Default::default()
        };
        assert_eq!(facility.geocode_query(), "Amazon ATL4, Union City, GA");
    }

    #[test]
    fn test_coordinates_flatten_into_record() {
        let json = r#"{"id":"x","lat":33.6,"lng":-84.4,"paved_area_pct":70.0}"#;
        let facility: Facility = serde_json::from_str(json).unwrap();
        assert_eq!(facility.coordinates, Coordinates::new(33.6, -84.4));
        assert_eq!(facility.adoption_status, AdoptionStatus::NotStarted);
    }
}
