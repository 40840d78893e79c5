use crate::mutation::Comparison;

const NO_DIFFERENCES: &str = "No differences detected. The enzyme is likely normal.";

/// Human-readable, one line per finding, in position order per kind.
pub fn render_report(comparison: &Comparison) -> String {
    if comparison.is_identical() {
        return NO_DIFFERENCES.to_string();
    }

    let mut lines = Vec::with_capacity(comparison.finding_count());
    for m in &comparison.mutations {
        lines.push(format!(
            "Position {}: {} -> {} | Possible effect: may disrupt enzyme activity or binding.",
            m.position, m.expected, m.observed
        ));
    }
    for r in &comparison.extra_residues {
        lines.push(format!(
            "Position {}: extra residue {} | Possible effect: structural disruption.",
            r.position, r.residue
        ));
    }
    for r in &comparison.missing_residues {
        lines.push(format!(
            "Position {}: missing residue {} | Possible effect: truncation of the enzyme.",
            r.position, r.residue
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{compare, TrailingPolicy};
    use crate::sequence::{ProteinSequence, SequenceRole};

    fn report(normal: &str, damaged: &str, policy: TrailingPolicy) -> String {
        let n = ProteinSequence::parse(normal, SequenceRole::Normal).unwrap();
        let d = ProteinSequence::parse(damaged, SequenceRole::Damaged).unwrap();
        render_report(&compare(&n, &d, policy))
    }

    #[test]
    fn test_identical_report() {
        assert_eq!(report("ABC", "ABC", TrailingPolicy::Asymmetric), NO_DIFFERENCES);
    }

    #[test]
    fn test_substitution_and_extra() {
        let text = report("ABC", "AXCD", TrailingPolicy::Asymmetric);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Position 2: B -> X | Possible effect: may disrupt enzyme activity or binding.",
                "Position 4: extra residue D | Possible effect: structural disruption.",
            ]
        );
    }

    #[test]
    fn test_missing_only_when_symmetric() {
        assert_eq!(report("ABCD", "ABC", TrailingPolicy::Asymmetric), NO_DIFFERENCES);
        assert_eq!(
            report("ABCD", "ABC", TrailingPolicy::Symmetric),
            "Position 4: missing residue D | Possible effect: truncation of the enzyme."
        );
    }
}
