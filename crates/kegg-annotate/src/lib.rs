//! KEGG Annotate Library
//!
//! Retrieves KEGG identifiers for proteins found by a DIAMOND
//! sequence-similarity search, using the UniProt Retrieve/ID-mapping
//! web service, and merges the results back into the hit table.
//!
//! # Example
//!
//! ```no_run
//! use kegg_annotate::annotate::{self, AnnotateOptions};
//! use kegg_annotate::config::MappingConfig;
//! use kegg_annotate::idmapping::MappingClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MappingClient::new(MappingConfig::from_env()?)?;
//!     let options = AnnotateOptions::new("hits.csv", "annotated.csv");
//!     annotate::run(&client, &options).await?;
//!     Ok(())
//! }
//! ```

pub mod annotate;
pub mod config;
pub mod error;
pub mod idmapping;
pub mod progress;

// Re-export commonly used types
pub use error::{AnnotateError, Result};
