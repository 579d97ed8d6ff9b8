//! Batch check of stored facility coordinates against a geocoder.
//!
//! Lookups run concurrently up to a configured bound, each under its own
//! timeout. Results are reported in the order facilities were submitted, not
//! the order lookups finish. A failed or timed-out lookup becomes a
//! `NOT_FOUND` row and the batch carries on.

mod cancel;
pub mod haversine;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn, Instrument};

use crate::error::ConfigError;
use crate::facility::{Coordinates, Facility};
use crate::services::geocoder::{Confidence, GeocodeMatch, Geocoder};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    /// Offsets beyond this many meters are flagged for review.
    pub review_threshold_m: f64,
    pub lookup_timeout_ms: u64,
    pub concurrency: usize,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            review_threshold_m: 500.0,
            lookup_timeout_ms: 10_000,
            concurrency: 4,
        }
    }
}

impl ValidatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::NotPositive("concurrency"));
        }
        if self.lookup_timeout_ms == 0 {
            return Err(ConfigError::NotPositive("lookup_timeout_ms"));
        }
        if !(self.review_threshold_m > 0.0) {
            return Err(ConfigError::NotPositive("review_threshold_m"));
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// Which facilities a run covers. Fixed when the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// The first `n` facilities in roster order.
    Sample(usize),
    Full,
}

impl ValidationScope {
    pub fn select<'a>(&self, facilities: &'a [Facility]) -> &'a [Facility] {
        match *self {
            ValidationScope::Sample(n) => &facilities[..n.min(facilities.len())],
            ValidationScope::Full => facilities,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub facility_id: String,
    pub facility_name: String,
    pub stored: Coordinates,
    pub suggested: Option<Coordinates>,
    pub matched_address: Option<String>,
    pub distance_m: Option<f64>,
    pub confidence: Confidence,
    pub needs_review: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    fn not_found(facility: &Facility, error: Option<String>) -> Self {
        Self {
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            stored: facility.coordinates,
            suggested: None,
            matched_address: None,
            distance_m: None,
            confidence: Confidence::NotFound,
            needs_review: true,
            error,
        }
    }

    fn matched(facility: &Facility, found: GeocodeMatch, threshold_m: f64) -> Self {
        let distance = haversine::distance_m(facility.coordinates, found.coordinates);
        Self {
            facility_id: facility.id.clone(),
            facility_name: facility.name.clone(),
            stored: facility.coordinates,
            suggested: Some(found.coordinates),
            matched_address: Some(found.matched_address),
            distance_m: Some(distance),
            confidence: found.confidence,
            needs_review: distance > threshold_m || found.confidence.is_weak(),
            error: None,
        }
    }
}

/// Reported after each facility, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationRun {
    pub total: usize,
    pub results: Vec<ValidationResult>,
    pub cancelled: bool,
}

impl ValidationRun {
    pub fn needs_review(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.needs_review)
    }

    pub fn count_by_confidence(&self, confidence: Confidence) -> usize {
        self.results
            .iter()
            .filter(|r| r.confidence == confidence)
            .count()
    }
}

/// Looks up every facility in `scope` and compares the answer to the stored
/// coordinates.
///
/// `on_progress` fires once per facility in submission order. When `cancel`
/// fires, lookups still queued or in flight are aborted and the run returns
/// what it has, with `cancelled` set.
#[tracing::instrument(skip_all, fields(scope = ?scope, concurrency = settings.concurrency))]
pub async fn validate_coordinates<G, F>(
    geocoder: Arc<G>,
    facilities: &[Facility],
    scope: ValidationScope,
    settings: &ValidatorSettings,
    mut cancel: CancelToken,
    mut on_progress: F,
) -> ValidationRun
where
    G: Geocoder + ?Sized + 'static,
    F: FnMut(Progress, &ValidationResult),
{
    let selected: Vec<Facility> = scope.select(facilities).to_vec();
    let total = selected.len();
    let timeout = settings.lookup_timeout();
    let threshold = settings.review_threshold_m;
    let semaphore = Arc::new(Semaphore::new(settings.concurrency.max(1)));

    info!(total, "Starting coordinate validation");

    let mut tasks = Vec::with_capacity(total);
    for facility in &selected {
        let sem = semaphore.clone();
        let geocoder = geocoder.clone();
        let facility = facility.clone();
        let span = tracing::info_span!("validate_facility", facility_id = %facility.id);

        let task = tokio::spawn(
            async move {
                let Ok(_permit) = sem.acquire_owned().await else {
                    return ValidationResult::not_found(&facility, Some("validator closed".into()));
                };

                let query = facility.geocode_query();
                match tokio::time::timeout(timeout, geocoder.search(&query)).await {
                    Ok(Ok(Some(found))) => {
                        debug!(confidence = found.confidence.as_str(), "Geocoder match");
                        ValidationResult::matched(&facility, found, threshold)
                    }
                    Ok(Ok(None)) => {
                        debug!(query = %query, "Geocoder found nothing");
                        ValidationResult::not_found(&facility, None)
                    }
                    Ok(Err(e)) => {
                        warn!(error = %e, "Geocoder lookup failed");
                        ValidationResult::not_found(&facility, Some(e.to_string()))
                    }
                    Err(_) => {
                        warn!(timeout_ms = timeout.as_millis() as u64, "Geocoder lookup timed out");
                        ValidationResult::not_found(
                            &facility,
                            Some(format!("lookup timed out after {} ms", timeout.as_millis())),
                        )
                    }
                }
            }
            .instrument(span),
        );

        tasks.push(task);
    }

    let mut run = ValidationRun {
        total,
        results: Vec::with_capacity(total),
        cancelled: false,
    };

    let mut remaining = tasks.into_iter().zip(selected.iter());
    for (mut task, facility) in remaining.by_ref() {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                task.abort();
                None
            }
            joined = &mut task => Some(joined),
        };

        let result = match joined {
            None => {
                run.cancelled = true;
                break;
            }
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                warn!(facility_id = %facility.id, error = %e, "Validation task failed");
                ValidationResult::not_found(facility, Some(e.to_string()))
            }
        };

        run.results.push(result);
        if let Some(last) = run.results.last() {
            on_progress(
                Progress {
                    completed: run.results.len(),
                    total,
                },
                last,
            );
        }
    }

    if run.cancelled {
        for (task, _) in remaining {
            task.abort();
        }
        info!(completed = run.results.len(), total, "Coordinate validation cancelled");
    } else {
        info!(
            total,
            needs_review = run.needs_review().count(),
            "Coordinate validation complete"
        );
    }

    run
}
