use thiserror::Error;

use crate::sequence::SequenceRole;

/// Rejection of caller-supplied input. Nothing is computed once one of these
/// is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{role} sequence is required")]
    Empty { role: SequenceRole },
    #[error("{role} sequence has invalid residue '{residue}' at position {position}")]
    InvalidResidue {
        role: SequenceRole,
        position: usize,
        residue: char,
    },
    #[error("Unknown scoring strategy: {0}")]
    UnknownStrategy(String),
    #[error("Unknown trailing-residue policy: {0}")]
    UnknownTrailingPolicy(String),
}
