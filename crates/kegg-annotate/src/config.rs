//! Configuration for the UniProt ID-mapping client
//!
//! Defaults follow the documented limits of the Retrieve/ID mapping
//! service; environment variables override defaults, CLI flags override
//! both.

use crate::error::Result;
use kegg_common::KeggError;
use std::time::Duration;

// ============================================================================
// Mapping Service Constants
// ============================================================================

/// Default UniProt Retrieve/ID mapping endpoint.
/// Can be overridden via the KEGG_MAPPING_URL environment variable.
pub const DEFAULT_MAPPING_URL: &str = "https://www.uniprot.org/uploadlists/";

/// Default timeout for mapping requests in seconds.
/// Can be overridden via the KEGG_HTTP_TIMEOUT_SECS environment variable.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

/// Maximum identifiers per request. Requests above ~50,000 identifiers
/// are likely to be rejected by the service, so large queries are split.
pub const DEFAULT_CHUNK_SIZE: usize = 20_000;

/// Delay between retries of a failed chunk, in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;

/// Configuration for [`crate::idmapping::MappingClient`]
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Mapping service endpoint URL
    pub url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Maximum identifiers per request
    pub chunk_size: usize,

    /// Delay between retries of a failed chunk
    pub retry_delay: Duration,

    /// Give up on a chunk after this many retries; `None` retries forever
    pub max_retries: Option<u32>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_MAPPING_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            chunk_size: DEFAULT_CHUNK_SIZE,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            max_retries: None,
        }
    }
}

impl MappingConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `KEGG_MAPPING_URL`: mapping service endpoint
    /// - `KEGG_HTTP_TIMEOUT_SECS`: request timeout in seconds
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("KEGG_MAPPING_URL") {
            config.url = url;
        }

        if let Ok(timeout) = std::env::var("KEGG_HTTP_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|_| {
                KeggError::config(format!("KEGG_HTTP_TIMEOUT_SECS must be an integer, got '{}'", timeout))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(KeggError::config("chunk size must be at least 1").into());
        }

        if self.url.is_empty() {
            return Err(KeggError::config("mapping URL must not be empty").into());
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MappingConfig::new();
        assert_eq!(config.url, DEFAULT_MAPPING_URL);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.retry_delay, Duration::from_secs(DEFAULT_RETRY_DELAY_SECS));
        assert!(config.max_retries.is_none());
        assert!(config.validate().is_ok());
    }

    // Environment mutations live in a single test so parallel test
    // threads don't observe each other's values.
    #[test]
    fn test_config_from_env() {
        std::env::set_var("KEGG_MAPPING_URL", "http://localhost:9000/map");
        std::env::set_var("KEGG_HTTP_TIMEOUT_SECS", "30");

        let config = MappingConfig::from_env().unwrap();
        assert_eq!(config.url, "http://localhost:9000/map");
        assert_eq!(config.timeout, Duration::from_secs(30));

        std::env::set_var("KEGG_HTTP_TIMEOUT_SECS", "not-a-number");
        assert!(MappingConfig::from_env().is_err());

        std::env::remove_var("KEGG_MAPPING_URL");
        std::env::remove_var("KEGG_HTTP_TIMEOUT_SECS");
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let config = MappingConfig {
            chunk_size: 0,
            ..MappingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
