use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, Once};
use std::thread;
use std::time::Duration;

use mutscope_core::{ProteinSequence, SequenceRole};
use mutscope_enzymes::{CancelToken, DeadlineLookup, EnzymeLookup, LookupError};
use mutscope_remote::blast::BlastClient;
use mutscope_remote::{RemoteError, RemoteLookup, RemoteSettings};
use pretty_assertions::assert_eq;

const PUT_PAGE: &str = include_str!("fixtures/blast_put.html");
const HITS_JSON: &str = include_str!("fixtures/blast_hits.json");
const TRYPSIN_ENTRY: &str = include_str!("fixtures/uniprot_P07477.json");

static BYPASS_PROXY: Once = Once::new();

/// Local stand-in for the BLAST and UniProt endpoints. Records the request
/// line of every request it answers.
struct Server {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Server {
    fn start<F>(status: F) -> Self
    where
        F: Fn() -> String + Send + 'static,
    {
        // requests to the stub must not go through a proxy
        BYPASS_PROXY.call_once(|| {
            std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
            std::env::set_var("no_proxy", "127.0.0.1,localhost");
        });

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let Ok(request_line) = read_request(&stream) else {
                    continue;
                };
                seen.lock().unwrap().push(request_line.clone());

                let body = if request_line.starts_with("POST") {
                    PUT_PAGE.to_string()
                } else if request_line.contains("FORMAT_OBJECT=SearchInfo") {
                    status()
                } else if request_line.contains("FORMAT_TYPE=JSON2_S") {
                    HITS_JSON.to_string()
                } else if request_line.contains("/uniprotkb/P07477.json") {
                    TRYPSIN_ENTRY.to_string()
                } else {
                    String::new()
                };
                let _ = write_response(stream, &body);
            }
        });

        Self { base, requests }
    }

    fn settings(&self, poll_attempts: u32, poll_interval: Duration) -> RemoteSettings {
        RemoteSettings {
            blast_url: format!("{}/blast", self.base),
            uniprot_url: format!("{}/uniprotkb", self.base),
            database: "swissprot".to_string(),
            timeout: Duration::from_secs(5),
            poll_attempts,
            poll_interval,
        }
    }

    fn count(&self, needle: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }

    fn total(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn read_request(stream: &TcpStream) -> io::Result<String> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 || header == "\r\n" {
            break;
        }
        if let Some(value) = header.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    Ok(request_line.trim().to_string())
}

fn write_response(mut stream: TcpStream, body: &str) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )?;
    stream.flush()
}

fn status_page(status: &str, there_are_hits: Option<&str>) -> String {
    let mut page = format!("<html><!--\nQBlastInfoBegin\n\tStatus={status}\nQBlastInfoEnd\n-->");
    if let Some(hits) = there_are_hits {
        page.push_str(&format!("<!--\nQBlastInfoBegin\n\tThereAreHits={hits}\nQBlastInfoEnd\n-->"));
    }
    page.push_str("</html>");
    page
}

const QUERY: &str = "MNPLLILTFVAAALAAPFDDDDKIVGGYNCEENSVPYQ";

#[test]
fn test_polling_stops_after_configured_attempts() {
    let server = Server::start(|| status_page("WAITING", None));
    let client = BlastClient::new(&server.settings(4, Duration::from_millis(5))).unwrap();

    let err = client.search(QUERY, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, RemoteError::PollExhausted(4)));
    assert_eq!(server.count("POST"), 1);
    assert_eq!(server.count("FORMAT_OBJECT=SearchInfo"), 4);
    assert_eq!(server.count("FORMAT_TYPE=JSON2_S"), 0);
}

#[test]
fn test_failed_search_stops_polling() {
    let server = Server::start(|| status_page("FAILED", None));
    let client = BlastClient::new(&server.settings(10, Duration::from_millis(5))).unwrap();

    let err = client.search(QUERY, &CancelToken::new()).unwrap_err();
    assert!(matches!(err, RemoteError::SearchFailed(_)));
    assert_eq!(server.count("FORMAT_OBJECT=SearchInfo"), 1);
}

#[test]
fn test_unknown_request_id() {
    let server = Server::start(|| status_page("UNKNOWN", None));
    let client = BlastClient::new(&server.settings(10, Duration::from_millis(5))).unwrap();

    match client.search(QUERY, &CancelToken::new()) {
        Err(RemoteError::SearchFailed(msg)) => assert!(msg.contains("expired")),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(server.count("FORMAT_OBJECT=SearchInfo"), 1);
}

#[test]
fn test_ready_without_hits_skips_result_download() {
    let server = Server::start(|| status_page("READY", Some("no")));
    let client = BlastClient::new(&server.settings(10, Duration::from_millis(5))).unwrap();

    let hits = client.search(QUERY, &CancelToken::new()).unwrap();
    assert!(hits.is_empty());
    assert_eq!(server.count("FORMAT_OBJECT=SearchInfo"), 1);
    assert_eq!(server.count("FORMAT_TYPE=JSON2_S"), 0);
}

#[test]
fn test_ready_with_hits() {
    let server = Server::start(|| status_page("READY", Some("yes")));
    let client = BlastClient::new(&server.settings(10, Duration::from_millis(5))).unwrap();

    let hits = client.search(QUERY, &CancelToken::new()).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].accession, "P07477");
    assert_eq!(server.count("FORMAT_TYPE=JSON2_S"), 1);
}

#[test]
fn test_remote_lookup_resolves_top_hit() {
    let server = Server::start(|| status_page("READY", Some("yes")));
    let lookup = RemoteLookup::new(&server.settings(10, Duration::from_millis(5))).unwrap();
    let sequence = ProteinSequence::parse(QUERY, SequenceRole::Normal).unwrap();

    let found = lookup.lookup(&sequence).unwrap().unwrap();
    assert_eq!(found.name, "Trypsinogen");
    assert_eq!(found.accession_id, "P07477");
    assert_eq!(server.count("/uniprotkb/P07477.json"), 1);
}

#[test]
fn test_cancelled_search_sends_nothing() {
    let server = Server::start(|| status_page("WAITING", None));
    let client = BlastClient::new(&server.settings(10, Duration::from_millis(5))).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    assert!(matches!(client.search(QUERY, &cancel), Err(RemoteError::Cancelled)));
    assert_eq!(server.total(), 0);
}

#[test]
fn test_deadline_stops_polling() {
    let server = Server::start(|| status_page("WAITING", None));
    let remote = RemoteLookup::new(&server.settings(1000, Duration::from_millis(20))).unwrap();
    let lookup = DeadlineLookup::new(remote, Duration::from_millis(250));
    let sequence = ProteinSequence::parse(QUERY, SequenceRole::Normal).unwrap();

    let err = lookup.lookup(&sequence).unwrap_err();
    assert!(matches!(err, LookupError::Timeout(_)));

    let at_deadline = server.total();
    assert!(at_deadline >= 2);
    thread::sleep(Duration::from_millis(500));
    // a poll already past its cancellation check may still land
    assert!(server.total() <= at_deadline + 1);
}
