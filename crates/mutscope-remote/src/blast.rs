use std::time::Duration;

use mutscope_enzymes::CancelToken;

use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{multispace0, not_line_ending, space0},
    multi::{many0, many1},
    sequence::{delimited, preceded, separated_pair},
    IResult,
};
use serde::Deserialize;

use crate::{http_client, read_body, RemoteError, RemoteSettings};

/// State of a queued BLAST search as reported by `FORMAT_OBJECT=SearchInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    Waiting,
    Ready,
    Failed,
    /// The request id is unknown to the server, usually because it expired.
    Unknown,
}

impl SearchStatus {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "WAITING" => Some(SearchStatus::Waiting),
            "READY" => Some(SearchStatus::Ready),
            "FAILED" => Some(SearchStatus::Failed),
            "UNKNOWN" => Some(SearchStatus::Unknown),
            _ => None,
        }
    }
}

/// Fields of the `QBlastInfoBegin ... QBlastInfoEnd` comment block NCBI
/// embeds in its HTML responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QBlastInfo {
    pub rid: Option<String>,
    /// Estimated seconds until results are ready.
    pub rtoe: Option<u64>,
    pub status: Option<SearchStatus>,
    pub there_are_hits: Option<bool>,
}

fn info_key(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn info_field(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        multispace0,
        separated_pair(info_key, delimited(space0, tag("="), space0), not_line_ending),
    )(input)
}

fn info_block(input: &str) -> IResult<&str, Vec<(&str, &str)>> {
    let (input, _) = take_until("QBlastInfoBegin")(input)?;
    let (input, _) = tag("QBlastInfoBegin")(input)?;
    let (input, fields) = many0(info_field)(input)?;
    let (input, _) = preceded(multispace0, tag("QBlastInfoEnd"))(input)?;
    Ok((input, fields))
}

/// Extract the QBlastInfo fields from a BLAST HTML page.
///
/// Status pages split their fields over several blocks; all of them are read.
pub fn parse_qblast_info(page: &str) -> Result<QBlastInfo, RemoteError> {
    let (_, blocks) = many1(info_block)(page)
        .map_err(|_| RemoteError::Parse("no QBlastInfo block in BLAST response".to_string()))?;

    let mut info = QBlastInfo::default();
    for (key, value) in blocks.into_iter().flatten() {
        let value = value.trim();
        match key {
            "RID" if !value.is_empty() => info.rid = Some(value.to_string()),
            "RTOE" => info.rtoe = value.parse().ok(),
            "Status" => info.status = SearchStatus::parse(value),
            "ThereAreHits" => info.there_are_hits = Some(value.eq_ignore_ascii_case("yes")),
            _ => {}
        }
    }
    Ok(info)
}

/// One database sequence aligned to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct BlastHit {
    pub accession: String,
    pub title: String,
    pub evalue: Option<f64>,
    pub identity: Option<u64>,
    pub align_len: Option<u64>,
}

impl BlastHit {
    /// Recommended protein name from a SwissProt title such as
    /// `RecName: Full=Trypsin-1; AltName: ...`, or the raw title otherwise.
    pub fn short_name(&self) -> &str {
        self.title
            .strip_prefix("RecName: Full=")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or(&self.title)
            .trim()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Json2Document {
    blast_output2: Vec<Json2Output>,
}

#[derive(Debug, Deserialize)]
struct Json2Output {
    report: Json2Report,
}

#[derive(Debug, Deserialize)]
struct Json2Report {
    results: Json2Results,
}

#[derive(Debug, Deserialize)]
struct Json2Results {
    search: Json2Search,
}

#[derive(Debug, Deserialize)]
struct Json2Search {
    #[serde(default)]
    hits: Vec<Json2Hit>,
}

#[derive(Debug, Deserialize)]
struct Json2Hit {
    #[serde(default)]
    description: Vec<Json2Description>,
    #[serde(default)]
    hsps: Vec<Json2Hsp>,
}

#[derive(Debug, Deserialize)]
struct Json2Description {
    accession: String,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
struct Json2Hsp {
    evalue: Option<f64>,
    identity: Option<u64>,
    align_len: Option<u64>,
}

/// Parse a `FORMAT_TYPE=JSON2_S` result document into hits, best first.
pub fn parse_hits(json: &str) -> Result<Vec<BlastHit>, RemoteError> {
    let document: Json2Document = serde_json::from_str(json)?;

    let hits = document
        .blast_output2
        .into_iter()
        .flat_map(|output| output.report.results.search.hits)
        .filter_map(|hit| {
            let hsp = hit.hsps.first();
            let description = hit.description.into_iter().next()?;
            Some(BlastHit {
                accession: description.accession,
                title: description.title,
                evalue: hsp.and_then(|h| h.evalue),
                identity: hsp.and_then(|h| h.identity),
                align_len: hsp.and_then(|h| h.align_len),
            })
        })
        .collect();

    Ok(hits)
}

/// Client for the NCBI BLAST URL API.
pub struct BlastClient {
    http: reqwest::blocking::Client,
    base_url: String,
    database: String,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl BlastClient {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        Ok(Self {
            http: http_client(settings.timeout)?,
            base_url: settings.blast_url.clone(),
            database: settings.database.clone(),
            poll_attempts: settings.poll_attempts,
            poll_interval: settings.poll_interval,
        })
    }

    /// Run a blastp search and return its hits, best first.
    ///
    /// `cancel` is checked before every request; the waits between polls end
    /// early when it is set.
    pub fn search(&self, query: &str, cancel: &CancelToken) -> Result<Vec<BlastHit>, RemoteError> {
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        let rid = self.submit(query)?;
        if !self.wait_for(&rid, cancel)? {
            tracing::debug!(%rid, "BLAST search finished without hits");
            return Ok(Vec::new());
        }
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }
        self.fetch_hits(&rid)
    }

    /// Queue a search, returning its request id.
    pub fn submit(&self, query: &str) -> Result<String, RemoteError> {
        let response = self
            .http
            .post(&self.base_url)
            .form(&[
                ("CMD", "Put"),
                ("PROGRAM", "blastp"),
                ("DATABASE", self.database.as_str()),
                ("QUERY", query),
            ])
            .send()?;
        let info = parse_qblast_info(&read_body(response)?)?;

        let rid = info
            .rid
            .ok_or_else(|| RemoteError::Parse("BLAST submission returned no RID".to_string()))?;
        tracing::info!(%rid, rtoe = ?info.rtoe, "BLAST search queued");
        Ok(rid)
    }

    /// Poll until the search is ready, at most `poll_attempts` times with a
    /// fixed wait before each poll. Returns whether it produced hits.
    pub fn wait_for(&self, rid: &str, cancel: &CancelToken) -> Result<bool, RemoteError> {
        for attempt in 1..=self.poll_attempts {
            if !cancel.sleep(self.poll_interval) {
                tracing::debug!(%rid, attempt, "BLAST polling cancelled");
                return Err(RemoteError::Cancelled);
            }

            let response = self
                .http
                .get(&self.base_url)
                .query(&[("CMD", "Get"), ("FORMAT_OBJECT", "SearchInfo"), ("RID", rid)])
                .send()?;
            let info = parse_qblast_info(&read_body(response)?)?;

            match info.status {
                Some(SearchStatus::Ready) => return Ok(info.there_are_hits.unwrap_or(false)),
                Some(SearchStatus::Failed) => {
                    return Err(RemoteError::SearchFailed(format!("search {rid} failed")));
                }
                Some(SearchStatus::Unknown) => {
                    return Err(RemoteError::SearchFailed(format!("search {rid} expired or unknown")));
                }
                Some(SearchStatus::Waiting) | None => {
                    tracing::debug!(%rid, attempt, "BLAST search still running");
                }
            }
        }

        Err(RemoteError::PollExhausted(self.poll_attempts))
    }

    pub fn fetch_hits(&self, rid: &str) -> Result<Vec<BlastHit>, RemoteError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("CMD", "Get"), ("FORMAT_TYPE", "JSON2_S"), ("RID", rid)])
            .send()?;
        parse_hits(&read_body(response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_submission_block() {
        let page = "<html><!--QBlastInfoBegin\n    RID = 8XK2T1YH016\n    RTOE = 18\nQBlastInfoEnd\n--></html>";
        let info = parse_qblast_info(page).unwrap();
        assert_eq!(info.rid.as_deref(), Some("8XK2T1YH016"));
        assert_eq!(info.rtoe, Some(18));
        assert_eq!(info.status, None);
    }

    #[test]
    fn test_parse_status_block() {
        let waiting = parse_qblast_info("<!--QBlastInfoBegin\n\tStatus=WAITING\nQBlastInfoEnd\n-->").unwrap();
        assert_eq!(waiting.status, Some(SearchStatus::Waiting));

        let ready = parse_qblast_info(
            "<!--QBlastInfoBegin\r\n\tStatus=READY\r\nQBlastInfoEnd\r\n--><!--QBlastInfoBegin\r\n\tThereAreHits=yes\r\nQBlastInfoEnd\r\n-->",
        )
        .unwrap();
        assert_eq!(ready.status, Some(SearchStatus::Ready));
        assert_eq!(ready.there_are_hits, Some(true));
    }

    #[test]
    fn test_missing_block() {
        assert!(matches!(
            parse_qblast_info("<html>Service unavailable</html>"),
            Err(RemoteError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_hits() {
        let json = r#"{"BlastOutput2":[{"report":{"program":"blastp","results":{"search":{"query_len":20,"hits":[
            {"num":1,"description":[{"id":"sp|P07477.1|TRY1_HUMAN","accession":"P07477","title":"RecName: Full=Serine protease 1; AltName: Full=Trypsin I","taxid":9606}],
             "len":247,"hsps":[{"num":1,"bit_score":41.2,"evalue":2e-07,"identity":20,"align_len":20}]},
            {"num":2,"description":[{"accession":"P08246","title":"RecName: Full=Neutrophil elastase"}],"hsps":[]}
        ]}}}}]}"#;

        let hits = parse_hits(json).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].accession, "P07477");
        assert_eq!(hits[0].short_name(), "Serine protease 1");
        assert_eq!(hits[0].identity, Some(20));
        assert_eq!(hits[1].evalue, None);
        assert_eq!(hits[1].short_name(), "Neutrophil elastase");
    }

    #[test]
    fn test_parse_hits_without_hits() {
        let json = r#"{"BlastOutput2":[{"report":{"results":{"search":{"query_len":5}}}}]}"#;
        assert!(parse_hits(json).unwrap().is_empty());
    }

    #[test]
    fn test_parse_hits_rejects_html() {
        assert!(matches!(parse_hits("<html></html>"), Err(RemoteError::Parse(_))));
    }
}
