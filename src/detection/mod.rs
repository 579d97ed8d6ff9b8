//! Yard object detection over aerial imagery.
//!
//! The score path only needs counts, so providers return [`Detections`] and
//! callers turn them into a YVS with [`Detections::score`].

pub mod mock;

use serde::Serialize;

use crate::analyzers::yvs::{velocity_score_with, ScoringWeights};
use crate::facility::Coordinates;

/// What a detection pass found at a facility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Detections {
    pub trailers: u32,
    pub tractors: u32,
    pub paved_area_pct: f64,
    pub gate_nodes: u32,
}

impl Detections {
    pub fn score(&self, weights: &ScoringWeights) -> f64 {
        velocity_score_with(weights, self.paved_area_pct, self.trailers, self.gate_nodes)
    }
}

/// Source of detection counts for a location.
pub trait DetectionProvider {
    fn detect(&self, at: Coordinates) -> anyhow::Result<Detections>;
}
