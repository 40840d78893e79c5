use mutscope_core::ProteinSequence;

use crate::catalog::EnzymeCatalog;
use crate::enzyme::EnzymeEntry;

/// The first catalog enzyme whose signature occurs in `sequence`.
///
/// Catalog order decides, not position: when two enzymes share a signature
/// the earlier entry wins.
pub fn identify_first<'a>(sequence: &ProteinSequence, catalog: &'a EnzymeCatalog) -> Option<&'a EnzymeEntry> {
    catalog
        .entries()
        .iter()
        .find(|entry| entry.signature.as_ref().is_some_and(|m| m.is_present_in(sequence)))
}
