//! Trait and types for interacting with a geocoding lookup.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::facility::Coordinates;

/// How well a geocoder's answer matched the query text.
///
/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
    NotFound,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "HIGH",
            Confidence::Medium => "MEDIUM",
            Confidence::Low => "LOW",
            Confidence::NotFound => "NOT_FOUND",
        }
    }

    /// `true` for answers too weak to trust without a human look.
    pub fn is_weak(&self) -> bool {
        matches!(self, Confidence::Low | Confidence::NotFound)
    }
}

/// Best match a geocoder returned for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeMatch {
    pub coordinates: Coordinates,
    pub matched_address: String,
    pub confidence: Confidence,
}

/// Abstraction over a geocoding provider (e.g., Mapbox).
///
/// `Ok(None)` means the provider answered but found nothing; `Err` means the
/// lookup itself failed.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<GeocodeMatch>>;
}
