use serde::Serialize;

/// Sales-priority band a YVS falls into.
///
/// | Range     | Tier     |
/// |-----------|----------|
/// | 80 - 100  | Whale    |
/// | 50 - <80  | Standard |
/// | 0 - <50   | Low      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreTier {
    Whale,
    Standard,
    Low,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => ScoreTier::Whale,
            s if s >= 50.0 => ScoreTier::Standard,
            _ => ScoreTier::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Whale => "WHALE",
            ScoreTier::Standard => "STANDARD",
            ScoreTier::Low => "LOW",
        }
    }
}

/// Sales guidance attached to a tier.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub tier: ScoreTier,
    pub label: &'static str,
    pub priority: &'static str,
    pub description: &'static str,
    pub expected_roi: &'static str,
    pub action: &'static str,
}

impl Classification {
    pub fn from_score(score: f64) -> Self {
        Self::for_tier(ScoreTier::from_score(score))
    }

    pub fn for_tier(tier: ScoreTier) -> Self {
        match tier {
            ScoreTier::Whale => Classification {
                tier,
                label: "WHALE",
                priority: "HIGH PRIORITY",
                description: "Enterprise-grade facility with massive yard friction",
                expected_roi: "$500K+ annually",
                action: "Immediate outreach with a pre-built digital twin demo",
            },
            ScoreTier::Standard => Classification {
                tier,
                label: "STANDARD",
                priority: "STANDARD PROSPECT",
                description: "Good automation candidate with solid ROI potential",
                expected_roi: "$50K-$500K annually",
                action: "Add to nurture campaign, send value proposition",
            },
            ScoreTier::Low => Classification {
                tier,
                label: "LOW",
                priority: "LOW PRIORITY",
                description: "Small operation or limited infrastructure",
                expected_roi: "Limited ROI potential",
                action: "Monitor for growth, deprioritize sales effort",
            },
        }
    }
}

pub fn interpret_paved(pct: f64) -> &'static str {
    match pct {
        p if p >= 90.0 => "Mega DC - maximum land utilization, high complexity",
        p if p >= 70.0 => "Standard DC - good operational footprint",
        p if p >= 50.0 => "Mixed-use - room for optimization",
        _ => "Limited paved area - may be office-heavy",
    }
}

pub fn interpret_trailers(count: u32) -> &'static str {
    match count {
        c if c >= 200 => "Whale territory - major distribution hub",
        c if c >= 100 => "High-volume facility - significant throughput",
        c if c >= 50 => "Regional depot - moderate activity",
        _ => "Small operation - limited scale",
    }
}

pub fn interpret_gates(count: u32) -> &'static str {
    match count {
        c if c >= 4 => "Complex multi-flow - high orchestration needs",
        c if c >= 2 => "Standard facility - some traffic separation",
        _ => "Single entry point - simple flow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_label_matches_serialized_form() {
        for tier in [ScoreTier::Whale, ScoreTier::Standard, ScoreTier::Low] {
            assert_eq!(serde_json::to_value(tier).unwrap(), tier.as_str());
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(ScoreTier::from_score(100.0), ScoreTier::Whale);
        assert_eq!(ScoreTier::from_score(80.0), ScoreTier::Whale);
        assert_eq!(ScoreTier::from_score(79.99), ScoreTier::Standard);
        assert_eq!(ScoreTier::from_score(50.0), ScoreTier::Standard);
        assert_eq!(ScoreTier::from_score(49.99), ScoreTier::Low);
        assert_eq!(ScoreTier::from_score(0.0), ScoreTier::Low);
    }

    #[test]
    fn test_classification_matches_tier() {
        let c = Classification::from_score(72.5);
        assert_eq!(c.tier, ScoreTier::Standard);
        assert_eq!(c.priority, "STANDARD PROSPECT");
        assert_eq!(Classification::from_score(91.0).label, "WHALE");
    }

    #[test]
    fn test_interpretation_bands() {
        assert!(interpret_paved(95.0).starts_with("Mega DC"));
        assert!(interpret_paved(49.0).starts_with("Limited"));
        assert!(interpret_trailers(200).starts_with("Whale"));
        assert!(interpret_trailers(99).starts_with("Regional"));
        assert!(interpret_gates(4).starts_with("Complex"));
        assert!(interpret_gates(1).starts_with("Single"));
    }
}
