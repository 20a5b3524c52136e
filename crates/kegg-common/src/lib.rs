//! KEGG Annotate Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error types and logging setup for the kegg-annotate workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`KeggError`] type and [`Result`] alias
//! - **Logging**: `tracing`-based logging configuration ([`logging::LogConfig`])
//!
//! # Example
//!
//! ```no_run
//! use kegg_common::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env().unwrap();
//! init_logging(&config).unwrap();
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{KeggError, Result};
