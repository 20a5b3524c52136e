//! KEGG annotation of DIAMOND hit tables
//!
//! Reads a DIAMOND hit table, maps the target accessions to KEGG
//! identifiers through the UniProt ID-mapping service, and writes the
//! table back out with the mapped identifiers joined on.

pub mod diamond;

use crate::error::Result;
use crate::idmapping::{MappingClient, MappingRow};
use diamond::{DiamondHit, DIAMOND_HEADERS};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::info;

/// Source namespace for the mapping query (UniProt accession or ID)
const FROM_DB: &str = "ACC+ID";

/// Target namespace for the mapping query
const TO_DB: &str = "KEGG_ID";

/// Organism tag selecting E. coli K-12 KEGG identifiers
pub const DEFAULT_ORGANISM_TAG: &str = "eco:";

/// Separator for identifier lists within one output cell
const LIST_SEPARATOR: &str = ";";

/// Options for an annotation run
#[derive(Debug, Clone)]
pub struct AnnotateOptions {
    /// Input DIAMOND hit table
    pub input: PathBuf,

    /// Output path for the annotated table
    pub output: PathBuf,

    /// Field delimiter of the input table
    pub delimiter: u8,

    /// Substring selecting organism-specific KEGG identifiers
    pub organism_tag: String,
}

impl AnnotateOptions {
    /// Create options with the default delimiter and organism tag
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            delimiter: b',',
            organism_tag: DEFAULT_ORGANISM_TAG.to_string(),
        }
    }
}

/// Annotate a DIAMOND hit table with KEGG identifiers
///
/// Derives a version-free lookup key per hit, maps the de-duplicated
/// key set through the ID-mapping service, aggregates the mapped
/// identifiers per key (organism-specific and all), and left-joins
/// both aggregates back onto the table. Hits without a mapping keep
/// empty annotation cells.
pub async fn run(client: &MappingClient, options: &AnnotateOptions) -> Result<()> {
    info!(input = %options.input.display(), "Loading DIAMOND hits");
    let hits = diamond::read_hits(&options.input, options.delimiter)?;
    info!(hits = hits.len(), "Loaded hit table");

    let keys = unique_target_keys(&hits);
    info!(targets = keys.len(), "Collected unique target accessions");

    let rows = client.map_identifiers(FROM_DB, TO_DB, &keys).await?;

    let organism_rows = group_rows(rows.iter().filter(|r| r.to.contains(&options.organism_tag)));
    let all_rows = group_rows(rows.iter());
    info!(
        mapped_targets = all_rows.len(),
        organism_targets = organism_rows.len(),
        "Aggregated KEGG identifiers"
    );

    write_annotated(
        &options.output,
        &hits,
        &organism_rows,
        &all_rows,
        &options.organism_tag,
    )?;
    info!(output = %options.output.display(), "Annotated table written");

    Ok(())
}

/// De-duplicated target keys in first-occurrence order
fn unique_target_keys(hits: &[DiamondHit]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for hit in hits {
        let key = diamond::target_key(&hit.target_accession);
        if seen.insert(key) {
            keys.push(key.to_string());
        }
    }

    keys
}

/// Group mapped identifiers into one ordered list per source key
fn group_rows<'a>(rows: impl Iterator<Item = &'a MappingRow>) -> HashMap<String, Vec<String>> {
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for row in rows {
        groups.entry(row.from.clone()).or_default().push(row.to.clone());
    }

    groups
}

/// Column name for the organism-specific aggregate
///
/// Yields "KEGG eco tag" for the default `eco:` tag, matching the
/// established output layout of the workflow.
fn organism_column(organism_tag: &str) -> String {
    format!("KEGG {} tag", organism_tag.trim_end_matches(':'))
}

/// Write the annotated table as CSV with a header row
fn write_annotated(
    path: &Path,
    hits: &[DiamondHit],
    organism_rows: &HashMap<String, Vec<String>>,
    all_rows: &HashMap<String, Vec<String>>,
    organism_tag: &str,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let organism_header = organism_column(organism_tag);
    let mut header: Vec<&str> = DIAMOND_HEADERS.to_vec();
    header.push("Target");
    header.push(&organism_header);
    header.push("KEGG all tags");
    writer.write_record(&header)?;

    for hit in hits {
        let key = diamond::target_key(&hit.target_accession);
        let organism_cell = join_cell(organism_rows.get(key));
        let all_cell = join_cell(all_rows.get(key));

        let mut record: Vec<&str> = hit.fields().to_vec();
        record.push(key);
        record.push(&organism_cell);
        record.push(&all_cell);
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render an aggregated identifier list as one cell; missing keys
/// (unmatched left-join rows) become an empty cell.
fn join_cell(values: Option<&Vec<String>>) -> String {
    values.map(|list| list.join(LIST_SEPARATOR)).unwrap_or_default()
}
