use mutscope_core::motif::Motif;
use serde::{Deserialize, Serialize};

/// A reference enzyme known to the built-in catalog.
///
/// Entries carry an optional signature motif. Only entries with a signature
/// can be identified locally; the rest exist so remote hits can be mapped
/// from a gene symbol to a curated enzyme name.
#[derive(Debug, Clone)]
pub struct EnzymeEntry {
    /// HGNC gene symbol (e.g. "PRSS1").
    pub gene: String,
    /// Display name (e.g. "Trypsinogen").
    pub name: String,
    /// UniProtKB accession.
    pub accession: String,
    /// Signature motif, if the enzyme can be recognized from sequence alone.
    pub signature: Option<Motif>,
    /// Short description of the enzyme's function.
    pub description: String,
}

impl EnzymeEntry {
    pub fn to_match(&self) -> EnzymeMatch {
        EnzymeMatch {
            name: self.name.clone(),
            accession_id: self.accession.clone(),
            function: Some(self.description.clone()),
        }
    }
}

/// An enzyme identity supplied by a lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnzymeMatch {
    pub name: String,
    pub accession_id: String,
    #[serde(default)]
    pub function: Option<String>,
}
