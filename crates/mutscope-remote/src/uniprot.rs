use serde::Deserialize;

use crate::{http_client, read_body, RemoteError, RemoteSettings};

/// The parts of a UniProtKB entry the analysis cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniProtRecord {
    pub accession: String,
    pub protein_name: Option<String>,
    pub gene: Option<String>,
    pub function: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryJson {
    primary_accession: String,
    #[serde(default)]
    protein_description: Option<ProteinDescriptionJson>,
    #[serde(default)]
    genes: Vec<GeneJson>,
    #[serde(default)]
    comments: Vec<CommentJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProteinDescriptionJson {
    recommended_name: Option<NameJson>,
    #[serde(default)]
    submission_names: Vec<NameJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameJson {
    full_name: ValueJson,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneJson {
    gene_name: Option<ValueJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentJson {
    comment_type: String,
    #[serde(default)]
    texts: Vec<ValueJson>,
}

#[derive(Debug, Deserialize)]
struct ValueJson {
    value: String,
}

/// Parse a UniProtKB REST entry (`/uniprotkb/{accession}.json`).
///
/// Reviewed entries carry a recommended name; unreviewed ones only have
/// submission names, which are used as a fallback.
pub fn parse_entry(json: &str) -> Result<UniProtRecord, RemoteError> {
    let entry: EntryJson = serde_json::from_str(json)?;

    let protein_name = entry.protein_description.and_then(|desc| {
        desc.recommended_name
            .or_else(|| desc.submission_names.into_iter().next())
            .map(|name| name.full_name.value)
    });

    let gene = entry
        .genes
        .into_iter()
        .find_map(|g| g.gene_name)
        .map(|name| name.value);

    let function = entry
        .comments
        .into_iter()
        .find(|c| c.comment_type == "FUNCTION")
        .and_then(|c| c.texts.into_iter().next())
        .map(|text| text.value);

    Ok(UniProtRecord {
        accession: entry.primary_accession,
        protein_name,
        gene,
        function,
    })
}

pub struct UniProtClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl UniProtClient {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        Ok(Self {
            http: http_client(settings.timeout)?,
            base_url: settings.uniprot_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn fetch(&self, accession: &str) -> Result<UniProtRecord, RemoteError> {
        let url = format!("{}/{}.json", self.base_url, accession);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()?;
        parse_entry(&read_body(response)?)
    }
}
