//! Yard Velocity Score (YVS).
//!
//! ```text
//! YVS = α·paved% + β·min(100, trailers/300·100) + γ·min(100, gates/5·100)
//! ```
//!
//! The score lands in `[0, 100]` for any input: trailer and gate terms
//! saturate at their benchmarks and paved area is clamped before weighting.

use serde::{Deserialize, Serialize};

use crate::analyzers::grade::{
    interpret_gates, interpret_paved, interpret_trailers, Classification,
};
use crate::error::ConfigError;
use crate::facility::Facility;

pub const ALPHA: f64 = 0.50;
pub const BETA: f64 = 0.30;
pub const GAMMA: f64 = 0.20;

/// Trailer count that maps to a full 100 on the trailer term.
pub const MAX_TRAILER_BENCHMARK: f64 = 300.0;
/// Gate count that maps to a full 100 on the gate term.
pub const MAX_GATE_BENCHMARK: f64 = 5.0;

/// Weights and normalization benchmarks for the YVS formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub paved: f64,
    pub trailers: f64,
    pub gates: f64,
    pub trailer_benchmark: f64,
    pub gate_benchmark: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            paved: ALPHA,
            trailers: BETA,
            gates: GAMMA,
            trailer_benchmark: MAX_TRAILER_BENCHMARK,
            gate_benchmark: MAX_GATE_BENCHMARK,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("paved", self.paved),
            ("trailers", self.trailers),
            ("gates", self.gates),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }

        let sum = self.paved + self.trailers + self.gates;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightSum(sum));
        }

        for (name, value) in [
            ("trailer_benchmark", self.trailer_benchmark),
            ("gate_benchmark", self.gate_benchmark),
        ] {
            if !value.is_finite() || !(value > 0.0) {
                return Err(ConfigError::NotPositive(name));
            }
        }
        Ok(())
    }
}

/// Maps a count onto 0-100 against `benchmark`, saturating at 100.
fn normalize(count: u32, benchmark: f64) -> f64 {
    ((count as f64 / benchmark) * 100.0).min(100.0)
}

fn clamp_paved(pct: f64) -> f64 {
    if pct.is_nan() {
        0.0
    } else {
        pct.clamp(0.0, 100.0)
    }
}

/// Computes YVS with the default weights.
pub fn velocity_score(paved_area_pct: f64, trailers: u32, gates: u32) -> f64 {
    velocity_score_with(&ScoringWeights::default(), paved_area_pct, trailers, gates)
}

/// Computes YVS with custom weights.
pub fn velocity_score_with(
    weights: &ScoringWeights,
    paved_area_pct: f64,
    trailers: u32,
    gates: u32,
) -> f64 {
    let paved = clamp_paved(paved_area_pct);

    weights.paved * paved
        + weights.trailers * normalize(trailers, weights.trailer_benchmark)
        + weights.gates * normalize(gates, weights.gate_benchmark)
}

/// YVS of a stored facility, read from its current attributes.
pub fn facility_score(facility: &Facility, weights: &ScoringWeights) -> f64 {
    velocity_score_with(
        weights,
        facility.paved_area_pct,
        facility.trailers_detected,
        facility.gate_nodes,
    )
}

/// One weighted term of the score.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentBreakdown {
    pub raw_value: f64,
    pub normalized: f64,
    pub weight: f64,
    pub contribution: f64,
    pub interpretation: &'static str,
}

/// How a score was assembled, term by term.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub total_score: f64,
    pub classification: Classification,
    pub paved_area: ComponentBreakdown,
    pub trailer_count: ComponentBreakdown,
    pub gate_nodes: ComponentBreakdown,
    pub formula: String,
}

pub fn explain(
    weights: &ScoringWeights,
    paved_area_pct: f64,
    trailers: u32,
    gates: u32,
) -> ScoreBreakdown {
    let total = velocity_score_with(weights, paved_area_pct, trailers, gates);
    let paved = clamp_paved(paved_area_pct);
    let trailer_norm = normalize(trailers, weights.trailer_benchmark);
    let gate_norm = normalize(gates, weights.gate_benchmark);

    ScoreBreakdown {
        total_score: total,
        classification: Classification::from_score(total),
        paved_area: ComponentBreakdown {
            raw_value: paved_area_pct,
            normalized: paved,
            weight: weights.paved,
            contribution: weights.paved * paved,
            interpretation: interpret_paved(paved_area_pct),
        },
        trailer_count: ComponentBreakdown {
            raw_value: trailers as f64,
            normalized: trailer_norm,
            weight: weights.trailers,
            contribution: weights.trailers * trailer_norm,
            interpretation: interpret_trailers(trailers),
        },
        gate_nodes: ComponentBreakdown {
            raw_value: gates as f64,
            normalized: gate_norm,
            weight: weights.gates,
            contribution: weights.gates * gate_norm,
            interpretation: interpret_gates(gates),
        },
        formula: format!(
            "({} × {:.1}) + ({} × {:.1}) + ({} × {:.1}) = {:.1}",
            weights.paved, paved, weights.trailers, trailer_norm, weights.gates, gate_norm, total
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!(ScoringWeights::default().validate().is_ok());
    }

    #[test]
    fn test_worked_example() {
        assert!(approx(velocity_score(85.0, 180, 3), 72.5));
    }

    #[test]
    fn test_trailer_and_gate_terms_saturate() {
        assert!(approx(velocity_score(0.0, 1000, 100), 50.0));
        assert!(approx(velocity_score(100.0, 300, 5), 100.0));
        assert!(approx(velocity_score(100.0, 5000, 50), 100.0));
    }

    #[test]
    fn test_score_stays_in_bounds() {
        for paved in [0.0, 12.5, 50.0, 99.9, 100.0] {
            for trailers in [0, 1, 150, 300, 10_000] {
                for gates in [0, 1, 3, 5, 40] {
                    let s = velocity_score(paved, trailers, gates);
                    assert!((0.0..=100.0).contains(&s), "{paved} {trailers} {gates} -> {s}");
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_paved_area_is_clamped() {
        assert!(approx(velocity_score(150.0, 0, 0), 50.0));
        assert!(approx(velocity_score(-20.0, 0, 0), 0.0));
        assert!(approx(velocity_score(f64::NAN, 0, 0), 0.0));
    }

    #[test]
    fn test_monotonic_in_each_input() {
        let base = velocity_score(60.0, 120, 2);
        assert!(velocity_score(61.0, 120, 2) >= base);
        assert!(velocity_score(60.0, 121, 2) >= base);
        assert!(velocity_score(60.0, 120, 3) >= base);

        let mut prev = 0.0;
        for trailers in (0..400).step_by(10) {
            let s = velocity_score(60.0, trailers, 2);
            assert!(s >= prev);
            prev = s;
        }
    }

    #[test]
    fn test_invalid_weights_rejected() {
        let weights = ScoringWeights {
            paved: 0.6,
            ..Default::default()
        };
        assert!(matches!(weights.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_negative_weight_rejected_even_when_sum_is_one() {
        let weights = ScoringWeights {
            paved: 1.5,
            trailers: -0.5,
            gates: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigError::InvalidWeight { name: "trailers", .. })
        ));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let nan_weight = ScoringWeights {
            gates: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_weight.validate(),
            Err(ConfigError::InvalidWeight { name: "gates", .. })
        ));

        for benchmark in [f64::NAN, f64::INFINITY, 0.0, -5.0] {
            let weights = ScoringWeights {
                gate_benchmark: benchmark,
                ..Default::default()
            };
            assert!(matches!(
                weights.validate(),
                Err(ConfigError::NotPositive("gate_benchmark"))
            ));
        }
    }

    #[test]
    fn test_explain_contributions_add_up() {
        let b = explain(&ScoringWeights::default(), 85.0, 180, 3);
        let sum = b.paved_area.contribution + b.trailer_count.contribution + b.gate_nodes.contribution;
        assert!(approx(sum, b.total_score));
        assert!(approx(b.paved_area.contribution, 42.5));
        assert!(approx(b.trailer_count.normalized, 60.0));
        assert!(approx(b.gate_nodes.normalized, 60.0));
        assert_eq!(b.classification.label, "STANDARD");
        assert_eq!(b.formula, "(0.5 × 85.0) + (0.3 × 60.0) + (0.2 × 60.0) = 72.5");
    }
}
