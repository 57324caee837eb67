//! Configuration for relay coverage planning.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::CoverageResult;
use super::types::RelayUrl;

/// Settings that shape a coverage run.
///
/// Serializable so a host application can keep it next to its other
/// settings and reload it between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Keep onion relays. Only set this when the client can reach Tor.
    #[serde(default)]
    pub onion_allowed: bool,
    /// Relays the client already subscribes to.
    ///
    /// Users served by one of these are not considered in the
    /// reachability pass, which keeps churn low between runs.
    #[serde(default)]
    pub pre_selected: BTreeSet<RelayUrl>,
}

impl CoverageConfig {
    /// Creates a configuration with onion relays disabled and nothing
    /// pre-selected.
    ///
    /// # Example
    ///
    /// ```
    /// use outbox_core::coverage::{CoverageConfig, RelayUrl};
    ///
    /// let config = CoverageConfig::new()
    ///     .with_onion_allowed(true)
    ///     .with_pre_selected_relay(RelayUrl::parse("wss://nos.lol").unwrap());
    /// assert!(config.onion_allowed);
    /// assert_eq!(config.pre_selected.len(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether onion relays are kept.
    #[must_use]
    pub fn with_onion_allowed(mut self, onion_allowed: bool) -> Self {
        self.onion_allowed = onion_allowed;
        self
    }

    /// Adds a relay the client already uses.
    #[must_use]
    pub fn with_pre_selected_relay(mut self, relay: RelayUrl) -> Self {
        self.pre_selected.insert(relay);
        self
    }

    /// Adds several relays the client already uses.
    #[must_use]
    pub fn with_pre_selected_relays(mut self, relays: impl IntoIterator<Item = RelayUrl>) -> Self {
        self.pre_selected.extend(relays);
        self
    }

    /// Relays the reachability pass treats as already chosen.
    ///
    /// Same set as [`pre_selected`](Self::pre_selected), named for how the
    /// selector uses it.
    #[must_use]
    pub const fn relay_urls_to_ignore(&self) -> &BTreeSet<RelayUrl> {
        &self.pre_selected
    }

    /// Serializes the configuration to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parses a configuration from JSON.
    ///
    /// Relay URLs are normalized while parsing.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a relay URL is invalid.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;

        config.pre_selected = config
            .pre_selected
            .iter()
            .map(|relay| RelayUrl::parse(relay.as_str()))
            .collect::<CoverageResult<_>>()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;

        Ok(config)
    }
}
