use mutscope_core::impact::assess_impact;
use mutscope_core::report::render_report;
use mutscope_core::{
    classify_impairment, compare, score_functionality, ProteinSequence, ScoringParams, ScoringStrategy,
    SequenceRole, TrailingPolicy, DEFAULT_IMPAIRMENT_THRESHOLD,
};
use mutscope_enzymes::{lookup_best_effort, EnzymeLookup, EnzymeMatch};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::dto::{AnalyzeRequest, AnalyzeResponse, EnzymeDto, FunctionalityScoreDto};
use crate::error::ServiceError;

/// Analysis defaults; a request may override strategy, threshold and
/// trailing policy.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub strategy: ScoringStrategy,
    pub params: ScoringParams,
    pub threshold: f64,
    pub trailing_policy: TrailingPolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            strategy: ScoringStrategy::default(),
            params: ScoringParams::default(),
            threshold: DEFAULT_IMPAIRMENT_THRESHOLD,
            trailing_policy: TrailingPolicy::default(),
        }
    }
}

impl From<&ServiceConfig> for AnalysisSettings {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            strategy: config.analysis.strategy,
            params: config.scoring_params(),
            threshold: config.analysis.threshold,
            trailing_policy: config.analysis.trailing_policy,
        }
    }
}

/// Compare a damaged protein against its normal form.
///
/// Validation happens before anything is computed. The enzyme lookup runs
/// on the normal sequence and is best-effort: its failure only leaves
/// `enzyme` empty.
pub fn analyze(
    request: &AnalyzeRequest,
    settings: &AnalysisSettings,
    lookup: &dyn EnzymeLookup,
) -> Result<AnalyzeResponse, ServiceError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", %request_id);
    let _enter = span.enter();

    let normal = ProteinSequence::parse(&request.normal_sequence, SequenceRole::Normal)?;
    let damaged = ProteinSequence::parse(&request.damaged_sequence, SequenceRole::Damaged)?;

    let strategy = match request.strategy.as_deref() {
        Some(name) => name.parse()?,
        None => settings.strategy,
    };
    let trailing_policy = match request.trailing_policy.as_deref() {
        Some(name) => name.parse()?,
        None => settings.trailing_policy,
    };
    let threshold = request.threshold.unwrap_or(settings.threshold);
    if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
        return Err(ServiceError::InvalidThreshold(threshold));
    }

    let comparison = compare(&normal, &damaged, trailing_policy);
    let score = score_functionality(&normal, &damaged, strategy, &settings.params);
    let impaired = classify_impairment(score, threshold);

    let enzyme = lookup_best_effort(lookup, &normal);
    let impaired_functions = impaired_functions(impaired, enzyme.as_ref());
    let impact = assess_impact(&comparison, enzyme.is_some());
    let report = render_report(&comparison);

    tracing::info!(
        normal_len = normal.len(),
        damaged_len = damaged.len(),
        mutations = comparison.mutations.len(),
        %strategy,
        score,
        impaired,
        "analysis complete"
    );

    Ok(AnalyzeResponse {
        request_id: request_id.to_string(),
        mutations: comparison.mutations,
        extra_residues: comparison.extra_residues,
        missing_residues: comparison.missing_residues,
        functionality_score: FunctionalityScoreDto::new(score),
        strategy: strategy.to_string(),
        impaired,
        impaired_functions,
        enzyme: enzyme.map(EnzymeDto::from),
        impact,
        report,
    })
}

/// Decode a JSON request and analyze it.
pub fn analyze_json(
    input: &str,
    settings: &AnalysisSettings,
    lookup: &dyn EnzymeLookup,
) -> Result<AnalyzeResponse, ServiceError> {
    let request: AnalyzeRequest = serde_json::from_str(input)?;
    analyze(&request, settings, lookup)
}

/// Functions at risk. Only reported when the sequence is impaired and the
/// enzyme is known.
fn impaired_functions(impaired: bool, enzyme: Option<&EnzymeMatch>) -> Vec<String> {
    match enzyme {
        Some(enzyme) if impaired => {
            let function = enzyme
                .function
                .clone()
                .unwrap_or_else(|| format!("{} enzymatic activity", enzyme.name));
            vec![function]
        }
        _ => Vec::new(),
    }
}
