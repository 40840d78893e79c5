use mutscope_core::ProteinSequence;
use mutscope_enzymes::catalog::{self, EnzymeCatalog};
use mutscope_enzymes::{CancelToken, EnzymeLookup, EnzymeMatch, LookupError};

use crate::blast::{BlastClient, BlastHit};
use crate::uniprot::{UniProtClient, UniProtRecord};
use crate::{RemoteError, RemoteSettings};

/// Identifies an enzyme by BLAST search, then resolves the top hit on UniProt.
pub struct RemoteLookup {
    blast: BlastClient,
    uniprot: UniProtClient,
    catalog: &'static EnzymeCatalog,
}

impl RemoteLookup {
    pub fn new(settings: &RemoteSettings) -> Result<Self, RemoteError> {
        Ok(Self {
            blast: BlastClient::new(settings)?,
            uniprot: UniProtClient::new(settings)?,
            catalog: catalog::builtin(),
        })
    }

    fn identify(&self, sequence: &ProteinSequence, cancel: &CancelToken) -> Result<Option<EnzymeMatch>, RemoteError> {
        let hits = self.blast.search(sequence.as_str(), cancel)?;
        let Some(top) = hits.first() else {
            return Ok(None);
        };
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled);
        }

        let record = match self.uniprot.fetch(&top.accession) {
            Ok(record) => Some(record),
            Err(err) => {
                // the BLAST title still names the protein
                tracing::warn!(accession = %top.accession, %err, "UniProt lookup failed");
                None
            }
        };

        Ok(Some(resolve_match(top, record.as_ref(), self.catalog)))
    }
}

impl EnzymeLookup for RemoteLookup {
    fn name(&self) -> &str {
        "remote"
    }

    fn lookup(&self, sequence: &ProteinSequence) -> Result<Option<EnzymeMatch>, LookupError> {
        Ok(self.identify(sequence, &CancelToken::new())?)
    }

    fn lookup_cancellable(
        &self,
        sequence: &ProteinSequence,
        cancel: &CancelToken,
    ) -> Result<Option<EnzymeMatch>, LookupError> {
        Ok(self.identify(sequence, cancel)?)
    }
}

/// Combine a BLAST hit and its UniProt record into an enzyme identity.
///
/// Naming prefers the catalog's curated name (by gene, then by accession),
/// then UniProt's protein name, then the BLAST title.
pub fn resolve_match(hit: &BlastHit, record: Option<&UniProtRecord>, catalog: &EnzymeCatalog) -> EnzymeMatch {
    let accession = record.map_or(hit.accession.as_str(), |r| r.accession.as_str());

    let curated = record
        .and_then(|r| r.gene.as_deref())
        .and_then(|gene| catalog.by_gene(gene))
        .or_else(|| catalog.by_accession(accession));

    let name = curated
        .map(|entry| entry.name.clone())
        .or_else(|| record.and_then(|r| r.protein_name.clone()))
        .unwrap_or_else(|| hit.short_name().to_string());

    let function = record
        .and_then(|r| r.function.clone())
        .or_else(|| curated.map(|entry| entry.description.clone()));

    EnzymeMatch {
        name,
        accession_id: accession.to_string(),
        function,
    }
}
