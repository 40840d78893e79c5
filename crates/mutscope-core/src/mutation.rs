use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::sequence::ProteinSequence;

/// A positional mismatch inside the overlapping length of two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    /// 1-based position in the normal sequence.
    pub position: usize,
    /// Residue in the normal sequence.
    pub expected: char,
    /// Residue in the damaged sequence.
    pub observed: char,
}

/// A residue past the end of the shorter sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailingResidue {
    /// 1-based position in the longer sequence.
    pub position: usize,
    pub residue: char,
}

/// How residues past the overlapping length are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingPolicy {
    /// Only a damaged sequence longer than the normal one yields findings
    /// ("extra residue"). A shorter damaged sequence yields nothing.
    #[default]
    Asymmetric,
    /// Both directions yield findings: "extra residue" for a longer damaged
    /// sequence, "missing residue" for a shorter one.
    Symmetric,
}

impl std::fmt::Display for TrailingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrailingPolicy::Asymmetric => write!(f, "asymmetric"),
            TrailingPolicy::Symmetric => write!(f, "symmetric"),
        }
    }
}

impl std::str::FromStr for TrailingPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asymmetric" => Ok(TrailingPolicy::Asymmetric),
            "symmetric" => Ok(TrailingPolicy::Symmetric),
            other => Err(ValidationError::UnknownTrailingPolicy(other.to_string())),
        }
    }
}

/// Everything the positional comparison found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub mutations: Vec<Mutation>,
    pub extra_residues: Vec<TrailingResidue>,
    pub missing_residues: Vec<TrailingResidue>,
}

impl Comparison {
    /// True when no finding of any kind was produced.
    pub fn is_identical(&self) -> bool {
        self.mutations.is_empty() && self.extra_residues.is_empty() && self.missing_residues.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.mutations.len() + self.extra_residues.len() + self.missing_residues.len()
    }
}

/// Positional substitutions over `min(len(normal), len(damaged))`.
pub fn find_mutations(normal: &ProteinSequence, damaged: &ProteinSequence) -> Vec<Mutation> {
    normal
        .as_bytes()
        .iter()
        .zip(damaged.as_bytes())
        .enumerate()
        .filter(|(_, (n, d))| n != d)
        .map(|(i, (&n, &d))| Mutation {
            position: i + 1,
            expected: n as char,
            observed: d as char,
        })
        .collect()
}

/// Substitutions plus trailing-residue findings according to `policy`.
pub fn compare(
    normal: &ProteinSequence,
    damaged: &ProteinSequence,
    policy: TrailingPolicy,
) -> Comparison {
    let mutations = find_mutations(normal, damaged);
    let extra_residues = trailing(damaged, normal.len());
    let missing_residues = match policy {
        TrailingPolicy::Asymmetric => Vec::new(),
        TrailingPolicy::Symmetric => trailing(normal, damaged.len()),
    };

    Comparison {
        mutations,
        extra_residues,
        missing_residues,
    }
}

/// Residues of `longer` past index `from`, with 1-based positions.
fn trailing(longer: &ProteinSequence, from: usize) -> Vec<TrailingResidue> {
    longer
        .as_bytes()
        .iter()
        .enumerate()
        .skip(from)
        .map(|(i, &b)| TrailingResidue {
            position: i + 1,
            residue: b as char,
        })
        .collect()
}
