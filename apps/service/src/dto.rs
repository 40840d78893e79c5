//! Flat, JSON-friendly DTOs for the analysis request/response contract.

use mutscope_core::impact::ImpactAssessment;
use mutscope_core::{Mutation, TrailingResidue, BASELINE_SCORE};
use mutscope_enzymes::EnzymeMatch;
use serde::{Deserialize, Serialize};

/// An analysis request.
///
/// Field names of older clients (`normalSeq`, `reference_sequence`, ...) are
/// accepted as aliases. Missing sequences deserialize as empty strings so
/// they are rejected by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default, alias = "normalSeq", alias = "reference_sequence")]
    pub normal_sequence: String,
    #[serde(default, alias = "damagedSeq", alias = "damaged_sequence")]
    pub damaged_sequence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_policy: Option<String>,
}

impl AnalyzeRequest {
    pub fn new(normal: impl Into<String>, damaged: impl Into<String>) -> Self {
        Self {
            normal_sequence: normal.into(),
            damaged_sequence: damaged.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalityScoreDto {
    pub normal: f64,
    pub damaged: f64,
}

impl FunctionalityScoreDto {
    pub fn new(damaged: f64) -> Self {
        Self {
            normal: BASELINE_SCORE,
            damaged,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnzymeDto {
    pub name: String,
    pub accession_id: String,
    pub function: Option<String>,
}

impl From<EnzymeMatch> for EnzymeDto {
    fn from(m: EnzymeMatch) -> Self {
        EnzymeDto {
            name: m.name,
            accession_id: m.accession_id,
            function: m.function,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub mutations: Vec<Mutation>,
    pub extra_residues: Vec<TrailingResidue>,
    pub missing_residues: Vec<TrailingResidue>,
    pub functionality_score: FunctionalityScoreDto,
    pub strategy: String,
    pub impaired: bool,
    pub impaired_functions: Vec<String>,
    pub enzyme: Option<EnzymeDto>,
    pub impact: ImpactAssessment,
    pub report: String,
}

/// Error body written in place of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
    pub status: u16,
}
