pub mod blast;
pub mod lookup;
pub mod uniprot;

use std::time::Duration;

use mutscope_enzymes::LookupError;
use thiserror::Error;

pub use lookup::RemoteLookup;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("BLAST search failed: {0}")]
    SearchFailed(String),
    #[error("BLAST search still running after {0} polls")]
    PollExhausted(u32),
    #[error("Remote lookup cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for RemoteError {
    fn from(err: serde_json::Error) -> Self {
        RemoteError::Parse(err.to_string())
    }
}

impl From<RemoteError> for LookupError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Parse(msg) => LookupError::Malformed(msg),
            RemoteError::Cancelled => LookupError::Cancelled,
            other => LookupError::Unavailable(other.to_string()),
        }
    }
}

/// Endpoints and limits for the remote collaborators.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub blast_url: String,
    pub uniprot_url: String,
    pub database: String,
    /// Per-request I/O timeout.
    pub timeout: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            blast_url: "https://blast.ncbi.nlm.nih.gov/Blast.cgi".to_string(),
            uniprot_url: "https://rest.uniprot.org/uniprotkb".to_string(),
            database: "swissprot".to_string(),
            timeout: Duration::from_secs(10),
            poll_attempts: 10,
            poll_interval: Duration::from_secs(5),
        }
    }
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, RemoteError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mutscope/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Read a response body, turning non-2xx statuses into [`RemoteError::Status`].
pub(crate) fn read_body(response: reqwest::blocking::Response) -> Result<String, RemoteError> {
    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            url,
        });
    }
    Ok(response.text()?)
}
