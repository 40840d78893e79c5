use serde::Serialize;

use crate::error::ValidationError;

/// Which side of a comparison a sequence was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceRole {
    Normal,
    Damaged,
}

impl std::fmt::Display for SequenceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SequenceRole::Normal => write!(f, "normal"),
            SequenceRole::Damaged => write!(f, "damaged"),
        }
    }
}

/// A protein sequence normalized for positional comparison.
///
/// Whitespace is stripped, residues are uppercased and FASTA header or comment
/// lines are dropped. A `ProteinSequence` is never empty: every constructor
/// rejects empty input, so downstream scoring can divide by its length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProteinSequence {
    residues: String,
}

impl ProteinSequence {
    /// Normalize and validate raw user input.
    ///
    /// Accepted residues are ASCII letters and `*` (translation stop).
    pub fn parse(raw: &str, role: SequenceRole) -> Result<Self, ValidationError> {
        let mut residues = String::with_capacity(raw.len());

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with('>') || trimmed.starts_with(';') {
                continue;
            }
            for c in trimmed.chars().filter(|c| !c.is_whitespace()) {
                if !(c.is_ascii_alphabetic() || c == '*') {
                    return Err(ValidationError::InvalidResidue {
                        role,
                        position: residues.len() + 1,
                        residue: c,
                    });
                }
                residues.push(c.to_ascii_uppercase());
            }
        }

        if residues.is_empty() {
            return Err(ValidationError::Empty { role });
        }

        Ok(Self { residues })
    }

    pub fn as_str(&self) -> &str {
        &self.residues
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.residues.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl std::fmt::Display for ProteinSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.residues)
    }
}

impl AsRef<str> for ProteinSequence {
    fn as_ref(&self) -> &str {
        &self.residues
    }
}
