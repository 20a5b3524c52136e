//! DIAMOND tabular output schema
//!
//! The fixed 12-column format produced by `diamond blastp --outfmt 6`.
//! Columns are carried through as text so values are written back out
//! exactly as they appeared in the input.

use crate::error::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column names for the 12-column DIAMOND tabular format
pub const DIAMOND_HEADERS: [&str; 12] = [
    "Query accession",
    "Target accession",
    "Sequence identity",
    "Length",
    "Mismatches",
    "Gap openings",
    "Query start",
    "Query end",
    "Target start",
    "Target end",
    "E-value",
    "Bit score",
];

/// One alignment from a DIAMOND search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiamondHit {
    /// Accession of the query sequence, as given in the input FASTA
    pub query_accession: String,
    /// Accession of the target database sequence the query aligned against
    pub target_accession: String,
    /// Percentage of identical residues in the local alignment
    pub sequence_identity: String,
    /// Total alignment length, including mismatches and gaps
    pub length: String,
    /// Number of non-identical residues aligned against each other
    pub mismatches: String,
    /// Number of gap openings
    pub gap_openings: String,
    /// Alignment start in the query (1-based)
    pub query_start: String,
    /// Alignment end in the query (1-based)
    pub query_end: String,
    /// Alignment start in the target (1-based)
    pub target_start: String,
    /// Alignment end in the target (1-based)
    pub target_end: String,
    /// Expected number of equally good chance hits per query
    pub e_value: String,
    /// Scoring-matrix independent similarity measure
    pub bit_score: String,
}

impl DiamondHit {
    /// The column values in schema order
    pub fn fields(&self) -> [&str; 12] {
        [
            &self.query_accession,
            &self.target_accession,
            &self.sequence_identity,
            &self.length,
            &self.mismatches,
            &self.gap_openings,
            &self.query_start,
            &self.query_end,
            &self.target_start,
            &self.target_end,
            &self.e_value,
            &self.bit_score,
        ]
    }
}

/// Derive the mapping lookup key from a target accession by stripping
/// the trailing version suffix (everything after the final `.`). An
/// accession without a version suffix is used verbatim.
pub fn target_key(accession: &str) -> &str {
    match accession.rfind('.') {
        Some(index) => &accession[..index],
        None => accession,
    }
}

/// Read a headerless DIAMOND hit table from a file
pub fn read_hits(path: &Path, delimiter: u8) -> Result<Vec<DiamondHit>> {
    let file = File::open(path)?;
    parse_hits(file, delimiter)
}

fn parse_hits<R: Read>(reader: R, delimiter: u8) -> Result<Vec<DiamondHit>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut hits = Vec::new();
    for record in csv_reader.deserialize() {
        hits.push(record?);
    }

    Ok(hits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_target_key_strips_version() {
        assert_eq!(target_key("P0A9P0.2"), "P0A9P0");
    }

    #[test]
    fn test_target_key_strips_after_last_dot() {
        assert_eq!(target_key("sp.P0A9P0.2"), "sp.P0A9P0");
    }

    #[test]
    fn test_target_key_without_version() {
        assert_eq!(target_key("P0A9P0"), "P0A9P0");
    }

    #[test]
    fn test_target_key_trailing_dot() {
        assert_eq!(target_key("P0A9P0."), "P0A9P0");
    }

    #[test]
    fn test_parse_hits() {
        let data = "\
q1,P0A9P0.2,98.5,100,2,0,1,100,5,104,1.5e-50,200.1
q2,P77580.1,85.0,90,5,1,1,90,2,91,3.2e-30,150.0
";
        let hits = parse_hits(data.as_bytes(), b',').unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].query_accession, "q1");
        assert_eq!(hits[0].target_accession, "P0A9P0.2");
        assert_eq!(hits[1].e_value, "3.2e-30");
    }

    #[test]
    fn test_parse_hits_tab_delimited() {
        let data = "q1\tP0A9P0.2\t98.5\t100\t2\t0\t1\t100\t5\t104\t1.5e-50\t200.1\n";
        let hits = parse_hits(data.as_bytes(), b'\t').unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].bit_score, "200.1");
    }

    #[test]
    fn test_parse_hits_wrong_column_count() {
        let data = "q1,P0A9P0.2,98.5\n";
        assert!(parse_hits(data.as_bytes(), b',').is_err());
    }

    #[test]
    fn test_fields_order_matches_headers() {
        let data = "q1,P0A9P0.2,98.5,100,2,0,1,100,5,104,1.5e-50,200.1\n";
        let hits = parse_hits(data.as_bytes(), b',').unwrap();
        let fields = hits[0].fields();
        assert_eq!(fields.len(), DIAMOND_HEADERS.len());
        assert_eq!(fields[1], "P0A9P0.2");
        assert_eq!(fields[11], "200.1");
    }
}
