//! Seeded stand-in for a real detection model, used for demos and tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::{DetectionProvider, Detections};
use crate::facility::Coordinates;

/// Default seed used when no explicit seed is provided.
const DEFAULT_SEED: u64 = 42;

/// Produces plausible counts from a seeded `ChaCha8Rng`.
///
/// The generator is re-seeded per call from the provider seed and the
/// coordinates, so a location always yields the same detections for a given
/// seed regardless of call order.
#[derive(Debug, Clone, Copy)]
pub struct MockDetectionProvider {
    seed: u64,
}

impl Default for MockDetectionProvider {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl MockDetectionProvider {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng_for(&self, at: Coordinates) -> ChaCha8Rng {
        let mixed = self.seed
            ^ at.lat.to_bits().rotate_left(17)
            ^ at.lng.to_bits().rotate_left(41);
        ChaCha8Rng::seed_from_u64(mixed)
    }
}

impl DetectionProvider for MockDetectionProvider {
    fn detect(&self, at: Coordinates) -> anyhow::Result<Detections> {
        let mut rng = self.rng_for(at);
        let detections = Detections {
            trailers: rng.gen_range(50..=250),
            tractors: rng.gen_range(5..=30),
            paved_area_pct: rng.gen_range(40.0..=95.0),
            gate_nodes: rng.gen_range(1..=5),
        };
        debug!(location = %at, ?detections, "Mock detections generated");
        Ok(detections)
    }
}
