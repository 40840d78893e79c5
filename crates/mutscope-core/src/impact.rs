use serde::{Deserialize, Serialize};

use crate::mutation::Comparison;

/// More substitutions than this are reported as severe.
pub const SEVERE_DIFFERENCE_COUNT: usize = 10;

/// Coarse damage class derived from the number of substitutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    None,
    Partial,
    Severe,
}

impl ImpactLevel {
    pub fn from_difference_count(count: usize) -> Self {
        match count {
            0 => ImpactLevel::None,
            n if n > SEVERE_DIFFERENCE_COUNT => ImpactLevel::Severe,
            _ => ImpactLevel::Partial,
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            ImpactLevel::None => "No functional damage detected",
            ImpactLevel::Partial => "Partial loss of enzymatic activity likely",
            ImpactLevel::Severe => "Severe functional impairment likely",
        }
    }

    pub fn damaged_region(&self) -> &'static str {
        match self {
            ImpactLevel::None => "None",
            _ => "Catalytic / structural region affected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::High => write!(f, "High"),
            Confidence::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Qualitative reading of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    pub level: ImpactLevel,
    pub summary: String,
    pub damaged_region: String,
    pub confidence: Confidence,
}

/// Assess a comparison. Without an identified enzyme the reading is
/// reported with low confidence.
pub fn assess_impact(comparison: &Comparison, enzyme_known: bool) -> ImpactAssessment {
    let level = ImpactLevel::from_difference_count(comparison.mutations.len());
    let confidence = match (enzyme_known, level) {
        (false, _) => Confidence::Low,
        (true, ImpactLevel::None) => Confidence::VeryHigh,
        (true, _) => Confidence::High,
    };

    ImpactAssessment {
        level,
        summary: level.summary().to_string(),
        damaged_region: level.damaged_region().to_string(),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::Mutation;

    fn with_mutations(n: usize) -> Comparison {
        Comparison {
            mutations: (1..=n)
                .map(|position| Mutation { position, expected: 'A', observed: 'G' })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(ImpactLevel::from_difference_count(0), ImpactLevel::None);
        assert_eq!(ImpactLevel::from_difference_count(1), ImpactLevel::Partial);
        assert_eq!(ImpactLevel::from_difference_count(10), ImpactLevel::Partial);
        assert_eq!(ImpactLevel::from_difference_count(11), ImpactLevel::Severe);
    }

    #[test]
    fn test_confidence() {
        assert_eq!(assess_impact(&with_mutations(0), true).confidence, Confidence::VeryHigh);
        assert_eq!(assess_impact(&with_mutations(3), true).confidence, Confidence::High);
        assert_eq!(assess_impact(&with_mutations(3), false).confidence, Confidence::Low);
    }

    #[test]
    fn test_assessment_text() {
        let a = assess_impact(&with_mutations(12), true);
        assert_eq!(a.summary, "Severe functional impairment likely");
        assert_eq!(a.damaged_region, "Catalytic / structural region affected");

        let none = assess_impact(&with_mutations(0), true);
        assert_eq!(none.damaged_region, "None");
    }

    #[test]
    fn test_confidence_serializes_with_space() {
        assert_eq!(
            serde_json::to_string(&Confidence::VeryHigh).unwrap(),
            "\"Very High\""
        );
    }
}
