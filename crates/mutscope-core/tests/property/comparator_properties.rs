use mutscope_core::{
    compare, find_mutations, score_functionality, scoring, ProteinSequence, ScoringParams,
    ScoringStrategy, SequenceRole, TrailingPolicy,
};
use proptest::prelude::*;

fn normal(s: &str) -> ProteinSequence {
    ProteinSequence::parse(s, SequenceRole::Normal).unwrap()
}

fn damaged(s: &str) -> ProteinSequence {
    ProteinSequence::parse(s, SequenceRole::Damaged).unwrap()
}

fn same_length_pair() -> impl Strategy<Value = (String, String)> {
    (1usize..120).prop_flat_map(|len| {
        (
            proptest::string::string_regex(&format!("[ACDEFGHIKLMNPQRSTVWY]{{{len}}}")).unwrap(),
            proptest::string::string_regex(&format!("[ACDEFGHIKLMNPQRSTVWY]{{{len}}}")).unwrap(),
        )
    })
}

proptest! {
    #[test]
    fn mutation_count_is_hamming_distance((a, b) in same_length_pair()) {
        let hamming = a.bytes().zip(b.bytes()).filter(|(x, y)| x != y).count();
        prop_assert_eq!(find_mutations(&normal(&a), &damaged(&b)).len(), hamming);
    }

    #[test]
    fn identity_has_no_findings(a in "[A-Z]{1,300}") {
        prop_assert!(find_mutations(&normal(&a), &damaged(&a)).is_empty());
        prop_assert!(compare(&normal(&a), &damaged(&a), TrailingPolicy::Symmetric).is_identical());
    }

    #[test]
    fn identity_scores_full(a in "[A-Z]{1,300}") {
        let params = ScoringParams::default();
        for strategy in ScoringStrategy::ALL {
            prop_assert_eq!(score_functionality(&normal(&a), &damaged(&a), strategy, &params), 100.0);
        }
    }

    #[test]
    fn exponential_decay_is_non_increasing(len in 1usize..500, n in 0usize..500) {
        let n = n.min(len);
        let k = ScoringParams::default().decay_constant;
        let fewer = scoring::exponential_decay(n, len, k);
        let more = scoring::exponential_decay((n + 1).min(len), len, k);
        prop_assert!(more <= fewer);
    }

    #[test]
    fn linear_decay_matches_formula(a in "[A-Y]{1,60}", flips in proptest::collection::vec(any::<bool>(), 60)) {
        let b: String = a
            .chars()
            .zip(flips.iter())
            .map(|(c, &flip)| if flip { 'Z' } else { c })
            .collect();
        let n = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
        let score = score_functionality(&normal(&a), &damaged(&b), ScoringStrategy::LinearDecay, &ScoringParams::default());
        prop_assert_eq!(score, (100.0 - 5.0 * n as f64).max(0.0));
    }

    #[test]
    fn similarity_ratio_stays_in_range(a in "[ACGT]{1,250}", b in "[ACGT]{1,250}") {
        let score = score_functionality(&normal(&a), &damaged(&b), ScoringStrategy::SimilarityRatio, &ScoringParams::default());
        prop_assert!((5.0..=100.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn every_score_is_bounded(a in "[A-Z]{1,100}", b in "[A-Z]{1,100}") {
        let params = ScoringParams::default();
        for strategy in ScoringStrategy::ALL {
            let score = score_functionality(&normal(&a), &damaged(&b), strategy, &params);
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn trailing_findings_cover_length_difference(a in "[A-Z]{1,80}", b in "[A-Z]{1,80}") {
        let cmp = compare(&normal(&a), &damaged(&b), TrailingPolicy::Symmetric);
        prop_assert_eq!(cmp.extra_residues.len(), b.len().saturating_sub(a.len()));
        prop_assert_eq!(cmp.missing_residues.len(), a.len().saturating_sub(b.len()));

        let asym = compare(&normal(&a), &damaged(&b), TrailingPolicy::Asymmetric);
        prop_assert!(asym.missing_residues.is_empty());
        prop_assert_eq!(asym.extra_residues, cmp.extra_residues);
    }
}
