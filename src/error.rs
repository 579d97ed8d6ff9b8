//! Domain errors callers may want to match on.
//!
//! I/O and adapter failures travel as `anyhow::Error`; these cover bad roster
//! data, bad engine configuration and bad pagination requests.

use crate::facility::AdoptionStatus;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("facility '{name}' has no id")]
    MissingId { name: String },
    #[error("duplicate facility id '{0}'")]
    DuplicateId(String),
    #[error("facility '{id}' has paved area {value}%, expected 0-100")]
    InvalidPavedArea { id: String, value: f64 },
    #[error("coordinates ({lat}, {lng}) are out of range")]
    InvalidCoordinates { lat: f64, lng: f64 },
    #[error("no facility with id '{0}'")]
    UnknownFacility(String),
    #[error("facility '{id}' cannot move from {from} back to {to}")]
    StatusRegression {
        id: String,
        from: AdoptionStatus,
        to: AdoptionStatus,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("scoring weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("weight {name} must be a finite number of at least zero, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("{0} must be a finite number greater than zero")]
    NotPositive(&'static str),
    #[error("{0} thresholds must be strictly increasing")]
    UnorderedThresholds(&'static str),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("page size must be at least 1")]
    ZeroPageSize,
    #[error("page numbers start at 1")]
    ZeroPage,
}
