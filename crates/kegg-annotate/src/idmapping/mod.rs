//! UniProt Retrieve/ID mapping client
//!
//! Converts identifiers between database namespaces (e.g. UniProt
//! accessions to KEGG identifiers) via the UniProt mapping web service.
//! See <https://www.uniprot.org/help/api_idmapping>.
//!
//! Queries above the service's size limit are split into chunks; a
//! failed chunk is retried after a fixed delay until it succeeds (or
//! until the configured retry cap, when one is set).

use crate::config::MappingConfig;
use crate::error::Result;
use crate::progress;
use kegg_common::KeggError;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// One row of a mapping response: a source identifier and the target
/// identifier it maps to. A source identifier may map to several rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MappingRow {
    /// Identifier in the source namespace
    pub from: String,

    /// Identifier in the target namespace
    pub to: String,
}

/// Split an identifier list into contiguous groups of at most `size`
/// elements. The last group may be shorter; an empty list yields no
/// groups.
pub fn chunks<T>(list: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    list.chunks(size)
}

/// Parse a tab-separated mapping response into rows
///
/// The first line is the column header and is skipped; a trailing
/// empty line is ignored. Each remaining line must hold at least two
/// tab-separated fields.
pub fn parse_tab_response(body: &str) -> kegg_common::Result<Vec<MappingRow>> {
    let mut lines = body.lines();

    let header = lines
        .next()
        .ok_or_else(|| KeggError::parse("empty mapping response"))?;
    debug!(header, "Parsing mapping response");

    let mut rows = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let (from, to) = match (fields.next(), fields.next()) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(KeggError::parse(format!(
                    "malformed mapping line (expected at least 2 tab-separated fields): '{}'",
                    line
                )))
            },
        };

        rows.push(MappingRow {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    Ok(rows)
}

/// Remove duplicate rows, keeping the first occurrence of each
fn dedup_rows(rows: Vec<MappingRow>) -> Vec<MappingRow> {
    let mut seen = HashSet::new();
    rows.into_iter().filter(|row| seen.insert(row.clone())).collect()
}

/// Client for the UniProt Retrieve/ID mapping service
pub struct MappingClient {
    client: reqwest::Client,
    config: MappingConfig,
}

impl MappingClient {
    /// Create a new mapping client
    pub fn new(config: MappingConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Map identifiers from one database namespace to another
    ///
    /// The query is split into chunks of at most the configured chunk
    /// size and each chunk is fetched sequentially. Duplicate rows are
    /// removed from the combined result, preserving first-occurrence
    /// order. The caller is expected to pass a duplicate-free query.
    pub async fn map_identifiers(
        &self,
        from_db: &str,
        to_db: &str,
        query: &[String],
    ) -> Result<Vec<MappingRow>> {
        let total = chunks(query, self.config.chunk_size).len();
        info!(
            identifiers = query.len(),
            chunks = total,
            from = from_db,
            to = to_db,
            "Mapping identifiers"
        );

        let pb = progress::create_progress_bar(total as u64, "Querying ID mapping service");

        let mut rows = Vec::new();
        for (index, chunk) in chunks(query, self.config.chunk_size).enumerate() {
            let chunk_rows = self.fetch_chunk(from_db, to_db, chunk, index + 1, total).await?;
            rows.extend(chunk_rows);
            pb.inc(1);
        }
        pb.finish_and_clear();

        let rows = dedup_rows(rows);
        info!(rows = rows.len(), "Mapping complete");

        Ok(rows)
    }

    /// Fetch one chunk, retrying on any failure
    ///
    /// Transport errors, non-success statuses, and unparseable bodies
    /// are all treated as retryable. Returns an error only when the
    /// configured retry cap is exceeded.
    async fn fetch_chunk(
        &self,
        from_db: &str,
        to_db: &str,
        chunk: &[String],
        index: usize,
        total: usize,
    ) -> Result<Vec<MappingRow>> {
        let query = chunk.join(" ");
        let form = [
            ("from", from_db),
            ("to", to_db),
            ("format", "tab"),
            ("query", query.as_str()),
        ];

        info!(chunk = index, total, identifiers = chunk.len(), "Querying chunk");

        let mut attempt: u32 = 0;
        loop {
            match self.try_fetch(&form).await {
                Ok(rows) => return Ok(rows),
                Err(err) => {
                    attempt += 1;
                    warn!(
                        chunk = index,
                        total,
                        attempt,
                        error = %err,
                        "Error querying chunk, trying again"
                    );

                    if let Some(max) = self.config.max_retries {
                        if attempt > max {
                            return Err(KeggError::network(format!(
                                "giving up on chunk {}/{} after {} retries",
                                index, total, max
                            ))
                            .into());
                        }
                    }

                    tokio::time::sleep(self.config.retry_delay).await;
                },
            }
        }
    }

    /// One request attempt for a chunk
    async fn try_fetch(&self, form: &[(&str, &str); 4]) -> Result<Vec<MappingRow>> {
        let response = self
            .client
            .post(&self.config.url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;

        Ok(parse_tab_response(&body)?)
    }

    /// The configured endpoint URL
    pub fn url(&self) -> &str {
        &self.config.url
    }
}
