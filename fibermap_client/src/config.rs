// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client configuration, read from RON text.

use std::path::Path;
use std::time::Duration;

use fibermap_tools::ToolConfig;
use serde::{Deserialize, Serialize};

/// Failure to read a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The text is not a valid configuration.
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Endpoints, timings, and tool tolerances of a client.
///
/// Every field is defaulted, so an empty file `()` is a valid configuration.
///
/// ```
/// use fibermap_client::ClientConfig;
///
/// let config = ClientConfig::from_ron_str(r#"(api_base: "https://fibers.example")"#).unwrap();
/// assert_eq!(config.api_base, "https://fibers.example");
/// assert_eq!(config.search_limit, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Origin of the backend API, without the `/api` prefix.
    pub api_base: String,
    /// Origin of the Nominatim-compatible geocoder.
    pub geocoder_base: String,
    /// `User-Agent` sent to the geocoder.
    pub user_agent: String,
    /// Preferred language for geocoder results.
    pub accept_language: Option<String>,
    /// Bearer token for the backend.
    pub access_token: Option<String>,
    /// Debounce of the map place search, in milliseconds.
    pub search_debounce_ms: u64,
    /// Debounce of the region search, in milliseconds.
    pub region_search_debounce_ms: u64,
    /// Maximum geocoder results per search.
    pub search_limit: usize,
    /// How long a notice stays visible, in milliseconds.
    pub notice_duration_ms: u64,
    /// Map tool tolerances.
    pub tools: ToolConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".into(),
            geocoder_base: "https://nominatim.openstreetmap.org".into(),
            user_agent: "CableNetworkDocumentation/1.0".into(),
            accept_language: None,
            access_token: None,
            search_debounce_ms: 200,
            region_search_debounce_ms: 300,
            search_limit: 5,
            notice_duration_ms: 3000,
            tools: ToolConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Parse RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Map search debounce.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Region search debounce.
    pub fn region_search_debounce(&self) -> Duration {
        Duration::from_millis(self.region_search_debounce_ms)
    }

    /// Notice display time.
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }
}
