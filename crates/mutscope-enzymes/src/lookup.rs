use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use mutscope_core::ProteinSequence;
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::catalog::{self, EnzymeCatalog};
use crate::enzyme::EnzymeMatch;
use crate::identify::identify_first;

/// Why a lookup produced no answer. Callers degrade to "no match" on any of
/// these; none of them should fail a request.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),
    #[error("Lookup service unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed lookup response: {0}")]
    Malformed(String),
    #[error("Lookup worker exited without a result")]
    WorkerLost,
    #[error("Lookup cancelled")]
    Cancelled,
}

/// A source of enzyme identities for a protein sequence.
pub trait EnzymeLookup: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// `Ok(None)` means the source answered but knows no matching enzyme.
    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError>;

    /// Like [`EnzymeLookup::lookup`], giving up with [`LookupError::Cancelled`]
    /// once `cancel` is set.
    ///
    /// The default only checks before starting. Lookups with several blocking
    /// steps override it and check between them.
    fn lookup_cancellable(
        &self,
        sequence: &ProteinSequence,
        cancel: &CancelToken,
    ) -> Result<Option<EnzymeMatch>, LookupError> {
        if cancel.is_cancelled() {
            return Err(LookupError::Cancelled);
        }
        self.lookup(sequence)
    }
}

impl<T: EnzymeLookup + ?Sized> EnzymeLookup for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        (**self).lookup(sequence)
    }

    fn lookup_cancellable(
        &self,
        sequence: &ProteinSequence,
        cancel: &CancelToken,
    ) -> Result<Option<EnzymeMatch>, LookupError> {
        (**self).lookup_cancellable(sequence, cancel)
    }
}

impl<T: EnzymeLookup + ?Sized> EnzymeLookup for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        (**self).lookup(sequence)
    }

    fn lookup_cancellable(
        &self,
        sequence: &ProteinSequence,
        cancel: &CancelToken,
    ) -> Result<Option<EnzymeMatch>, LookupError> {
        (**self).lookup_cancellable(sequence, cancel)
    }
}

/// Never identifies anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl EnzymeLookup for NoLookup {
    fn name(&self) -> &str {
        "none"
    }

    fn lookup(&self, _sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        Ok(None)
    }
}

/// Identifies enzymes by catalog signature motifs, fully offline.
#[derive(Debug, Clone, Copy)]
pub struct CatalogLookup<'a> {
    catalog: &'a EnzymeCatalog,
}

impl<'a> CatalogLookup<'a> {
    pub fn new(catalog: &'a EnzymeCatalog) -> Self {
        Self { catalog }
    }
}

impl CatalogLookup<'static> {
    pub fn builtin() -> Self {
        Self::new(catalog::builtin())
    }
}

impl EnzymeLookup for CatalogLookup<'_> {
    fn name(&self) -> &str {
        "catalog"
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        Ok(identify_first(sequence, self.catalog).map(|entry| entry.to_match()))
    }
}

/// Tries each stage in order and returns the first match.
///
/// A stage error is logged and the next stage is tried. The chain only
/// fails when every stage failed. Cancellation stops it between stages.
pub struct ChainedLookup {
    stages: Vec<Box<dyn EnzymeLookup>>,
}

impl ChainedLookup {
    pub fn new(stages: Vec<Box<dyn EnzymeLookup>>) -> Self {
        Self { stages }
    }
}

impl EnzymeLookup for ChainedLookup {
    fn name(&self) -> &str {
        "chain"
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        self.lookup_cancellable(sequence, &CancelToken::new())
    }

    fn lookup_cancellable(
        &self,
        sequence: &ProteinSequence,
        cancel: &CancelToken,
    ) -> Result<Option<EnzymeMatch>, LookupError> {
        let mut last_err = None;
        let mut answered = false;

        for stage in &self.stages {
            if cancel.is_cancelled() {
                return Err(LookupError::Cancelled);
            }
            match stage.lookup_cancellable(sequence, cancel) {
                Ok(Some(found)) => return Ok(Some(found)),
                Ok(None) => answered = true,
                Err(err) => {
                    tracing::warn!(stage = stage.name(), %err, "lookup stage failed");
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(err) if !answered => Err(err),
            _ => Ok(None),
        }
    }
}

/// Bounds any lookup by a wall-clock deadline.
///
/// The inner lookup runs on a worker thread. When the deadline passes
/// [`LookupError::Timeout`] is returned and the worker's [`CancelToken`] is
/// set, so a cooperative lookup stops at its next check. A request already
/// in flight still runs to its own I/O timeout.
pub struct DeadlineLookup<L> {
    inner: Arc<L>,
    deadline: Duration,
}

impl<L: EnzymeLookup + 'static> DeadlineLookup<L> {
    pub fn new(inner: L, deadline: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            deadline,
        }
    }
}

impl<L: EnzymeLookup + 'static> EnzymeLookup for DeadlineLookup<L> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        let inner = Arc::clone(&self.inner);
        let sequence = sequence.clone();
        let worker_cancel = CancelToken::new();
        let cancel_worker = worker_cancel.clone();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("enzyme-lookup".to_string())
            .spawn(move || {
                // receiver may be gone after a timeout
                let _ = tx.send(inner.lookup_cancellable(&sequence, &worker_cancel));
            })
            .map_err(|e| LookupError::Unavailable(format!("could not start lookup worker: {e}")))?;

        match rx.recv_timeout(self.deadline) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                cancel_worker.cancel();
                tracing::debug!(lookup = self.inner.name(), deadline = ?self.deadline, "lookup deadline passed, worker cancelled");
                Err(LookupError::Timeout(self.deadline))
            }
            Err(RecvTimeoutError::Disconnected) => Err(LookupError::WorkerLost),
        }
    }
}

/// Run a lookup, turning every failure into "no match".
pub fn lookup_best_effort(lookup: &dyn EnzymeLookup, sequence: &ProteinSequence) -> Option<EnzymeMatch> {
    match lookup.lookup(sequence) {
        Ok(Some(found)) => {
            tracing::info!(lookup = lookup.name(), enzyme = %found.name, accession = %found.accession_id, "enzyme identified");
            Some(found)
        }
        Ok(None) => {
            tracing::debug!(lookup = lookup.name(), "no enzyme match");
            None
        }
        Err(err) => {
            tracing::warn!(lookup = lookup.name(), %err, "enzyme lookup failed, continuing without a match");
            None
        }
    }
}
