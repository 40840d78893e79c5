use std::collections::HashMap;
use std::sync::LazyLock;

use mutscope_core::motif::Motif;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, none_of},
    combinator::{map, value},
    multi::{many0, separated_list0},
    sequence::delimited,
    IResult,
};

use crate::enzyme::EnzymeEntry;

/// Reference enzymes, one per line after the header.
const ENZYMES_CSV: &str = include_str!("../data/enzymes.csv");

static BUILTIN: LazyLock<EnzymeCatalog> = LazyLock::new(|| EnzymeCatalog::from_csv(ENZYMES_CSV));

/// Read-only enzyme reference table.
///
/// The process-wide instance is parsed once on first use by [`builtin`] and
/// shared immutably afterwards.
#[derive(Debug, Clone, Default)]
pub struct EnzymeCatalog {
    entries: Vec<EnzymeEntry>,
    by_gene: HashMap<String, usize>,
}

/// The catalog embedded in the binary.
pub fn builtin() -> &'static EnzymeCatalog {
    &BUILTIN
}

impl EnzymeCatalog {
    pub fn new(entries: Vec<EnzymeEntry>) -> Self {
        let by_gene = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.gene.to_uppercase(), i))
            .collect();
        Self { entries, by_gene }
    }

    /// Parse catalog CSV.
    ///
    /// CSV columns: gene, name, accession, signature, description.
    /// Rows with too few columns, an empty name or an unparsable signature
    /// are skipped.
    pub fn from_csv(csv: &str) -> Self {
        let mut entries = Vec::new();

        for line in csv.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields = parse_csv_line(line);
            if fields.len() < 5 {
                continue;
            }

            let (gene, name, accession, signature, description) =
                (&fields[0], &fields[1], &fields[2], &fields[3], &fields[4]);

            if name.is_empty() || accession.is_empty() {
                continue;
            }

            let signature = if signature.is_empty() {
                None
            } else {
                match Motif::new(signature) {
                    Ok(motif) => Some(motif),
                    Err(err) => {
                        tracing::warn!(%name, %signature, %err, "skipping catalog row with bad signature");
                        continue;
                    }
                }
            };

            entries.push(EnzymeEntry {
                gene: gene.to_uppercase(),
                name: name.to_string(),
                accession: accession.to_string(),
                signature,
                description: description.to_string(),
            });
        }

        Self::new(entries)
    }

    /// Entries in catalog order. Signature identification honors this order.
    pub fn entries(&self) -> &[EnzymeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look an entry up by gene symbol (case-insensitive).
    pub fn by_gene(&self, gene: &str) -> Option<&EnzymeEntry> {
        self.by_gene
            .get(&gene.trim().to_uppercase())
            .map(|&i| &self.entries[i])
    }

    /// Look an entry up by UniProtKB accession, ignoring any version suffix.
    pub fn by_accession(&self, accession: &str) -> Option<&EnzymeEntry> {
        let bare = accession.split('.').next().unwrap_or(accession);
        self.entries.iter().find(|e| e.accession.eq_ignore_ascii_case(bare))
    }
}

fn quoted_field(input: &str) -> IResult<&str, String> {
    let escaped_quote = value('"', tag("\"\""));
    map(
        delimited(char('"'), many0(alt((escaped_quote, none_of("\"")))), char('"')),
        |chars: Vec<char>| chars.into_iter().collect(),
    )(input)
}

fn bare_field(input: &str) -> IResult<&str, String> {
    map(take_while(|c: char| c != ','), str::to_string)(input)
}

/// Split one CSV row. Quoted fields may hold commas and `""` escapes.
/// Malformed quoting ends the row early.
fn parse_csv_line(line: &str) -> Vec<String> {
    separated_list0(char(','), alt((quoted_field, bare_field)))(line)
        .map(|(_, fields)| fields)
        .unwrap_or_default()
}
