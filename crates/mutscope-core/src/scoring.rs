use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::matcher::{OpTag, SequenceMatcher};
use crate::mutation::find_mutations;
use crate::sequence::ProteinSequence;

/// Score of an undamaged sequence.
pub const BASELINE_SCORE: f64 = 100.0;
/// Scores strictly below this classify a sequence as impaired.
pub const DEFAULT_IMPAIRMENT_THRESHOLD: f64 = 60.0;
/// Lowest score the similarity-ratio strategy can produce.
pub const SIMILARITY_FLOOR: f64 = 5.0;
/// Cap on the similarity-ratio penalty factor.
pub const MAX_PENALTY_FACTOR: f64 = 0.6;

/// The functionality heuristics. None of them is canonical; callers pick one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringStrategy {
    /// `100 * exp(-k * mutations / len(normal))`
    #[default]
    ExponentialDecay,
    /// Matching-block similarity scaled down by replaced/deleted residues,
    /// floored at 5.
    SimilarityRatio,
    /// `max(0, 100 - penalty * mutations)`
    LinearDecay,
}

impl ScoringStrategy {
    pub const ALL: [ScoringStrategy; 3] = [
        ScoringStrategy::ExponentialDecay,
        ScoringStrategy::SimilarityRatio,
        ScoringStrategy::LinearDecay,
    ];
}

impl std::fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringStrategy::ExponentialDecay => write!(f, "exponential-decay"),
            ScoringStrategy::SimilarityRatio => write!(f, "similarity-ratio"),
            ScoringStrategy::LinearDecay => write!(f, "linear-decay"),
        }
    }
}

impl std::str::FromStr for ScoringStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "exponential-decay" | "exponential" => Ok(ScoringStrategy::ExponentialDecay),
            "similarity-ratio" | "similarity" => Ok(ScoringStrategy::SimilarityRatio),
            "linear-decay" | "linear" => Ok(ScoringStrategy::LinearDecay),
            other => Err(ValidationError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Tunable constants of the scoring strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringParams {
    /// Decay constant `k` of the exponential strategy.
    pub decay_constant: f64,
    /// Points lost per mutation in the linear strategy.
    pub linear_penalty: f64,
    /// Popular-residue heuristic of the matching-block search. Off by
    /// default: it breaks the decomposition of proteins of 200+ residues.
    pub autojunk: bool,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            decay_constant: 4.0,
            linear_penalty: 5.0,
            autojunk: false,
        }
    }
}

/// Estimated residual function of `damaged`, in [0, 100], rounded to two
/// decimals. Identical sequences always score 100.
pub fn score_functionality(
    normal: &ProteinSequence,
    damaged: &ProteinSequence,
    strategy: ScoringStrategy,
    params: &ScoringParams,
) -> f64 {
    let raw = match strategy {
        ScoringStrategy::ExponentialDecay => exponential_decay(
            find_mutations(normal, damaged).len(),
            normal.len(),
            params.decay_constant,
        ),
        ScoringStrategy::LinearDecay => {
            linear_decay(find_mutations(normal, damaged).len(), params.linear_penalty)
        }
        ScoringStrategy::SimilarityRatio => similarity_ratio(normal, damaged, params.autojunk),
    };
    round2(raw)
}

pub fn exponential_decay(mutation_count: usize, normal_len: usize, decay_constant: f64) -> f64 {
    let rate = mutation_count as f64 / normal_len.max(1) as f64;
    BASELINE_SCORE * (-decay_constant * rate).exp()
}

pub fn linear_decay(mutation_count: usize, penalty: f64) -> f64 {
    (BASELINE_SCORE - mutation_count as f64 * penalty).max(0.0)
}

/// Similarity ratio times `1 - min(penalty / len(normal), 0.6)`, where the
/// penalty is the normal-side length of all replace and delete opcodes.
///
/// Residues only present in `damaged` (insert opcodes) carry no penalty;
/// they lower the score through the ratio alone.
pub fn similarity_ratio(normal: &ProteinSequence, damaged: &ProteinSequence, autojunk: bool) -> f64 {
    let matcher = SequenceMatcher::with_autojunk(normal.as_bytes(), damaged.as_bytes(), autojunk);
    let blocks = matcher.matching_blocks();
    let similarity = matcher.ratio_for(&blocks);

    let penalty: usize = SequenceMatcher::opcodes_for(&blocks)
        .iter()
        .filter(|op| matches!(op.tag, OpTag::Replace | OpTag::Delete))
        .map(|op| op.a_len())
        .sum();
    let penalty_factor = (penalty as f64 / normal.len().max(1) as f64).min(MAX_PENALTY_FACTOR);

    (similarity * (1.0 - penalty_factor) * BASELINE_SCORE).max(SIMILARITY_FLOOR)
}

/// True when `score` is below `threshold`: enzyme function should be treated
/// as lost or impaired.
pub fn classify_impairment(score: f64, threshold: f64) -> bool {
    score < threshold
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
