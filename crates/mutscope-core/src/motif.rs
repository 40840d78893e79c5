use regex::Regex;

use crate::sequence::ProteinSequence;

/// A compiled residue motif, e.g. a catalytic-site signature.
///
/// Plain residue strings match literally; regex syntax is accepted for
/// degenerate positions (`IVGG[YF]`). Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct Motif {
    pattern: String,
    regex: Regex,
}

impl Motif {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("(?i){}", pattern))?;
        Ok(Self {
            pattern: pattern.to_uppercase(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_present_in(&self, sequence: &ProteinSequence) -> bool {
        self.regex.is_match(sequence.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::SequenceRole;

    fn protein(s: &str) -> ProteinSequence {
        ProteinSequence::parse(s, SequenceRole::Normal).unwrap()
    }

    #[test]
    fn test_motif_degenerate_position() {
        let motif = Motif::new("IVGG[YF]").unwrap();
        assert!(motif.is_present_in(&protein("MKIVGGFTC")));
        assert!(!motif.is_present_in(&protein("MKIVGGWTC")));
    }

    #[test]
    fn test_motif_is_case_insensitive() {
        let motif = Motif::new("cggsi").unwrap();
        assert_eq!(motif.pattern(), "CGGSI");
        assert!(motif.is_present_in(&protein("AACGGSIAA")));
    }

    #[test]
    fn test_invalid_motif() {
        assert!(Motif::new("IVGG[").is_err());
    }
}
