//! Relay URL normalization and classification.
//!
//! Raw relay strings come from user-published relay lists and are full of
//! cosmetic variation. Normalizing them first makes `wss://Relay.Example.COM/`
//! and `wss://relay.example.com` count as one relay.
//!
//! # Normalization Rules
//!
//! - Trim surrounding whitespace
//! - Require a websocket scheme (wss:// or ws://)
//! - Lowercase scheme and host, drop the default port
//! - Remove trailing slashes
//!
//! Localhost and onion detection work on the canonical form and are used
//! by the coverage filter to drop relays the client cannot or should not
//! reach.

use std::net::{Ipv4Addr, Ipv6Addr};

use nostr::types::url::Host;

use super::error::{CoverageError, CoverageResult};
use super::types::RelayUrl;

impl RelayUrl {
    /// Normalizes a raw relay string.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::InvalidUrl`] if the string does not use a
    /// websocket scheme or is not a valid URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use outbox_core::coverage::RelayUrl;
    ///
    /// let url = RelayUrl::parse("wss://Relay.Example.COM/").unwrap();
    /// assert_eq!(url.as_str(), "wss://relay.example.com");
    /// ```
    pub fn parse(raw: &str) -> CoverageResult<Self> {
        let raw = raw.trim();

        if !raw.starts_with("wss://") && !raw.starts_with("ws://") {
            return Err(CoverageError::InvalidUrl(format!(
                "{raw}: must start with wss:// or ws://"
            )));
        }

        let parsed = nostr::RelayUrl::parse(raw)
            .map_err(|e| CoverageError::InvalidUrl(format!("{raw}: {e}")))?;

        Ok(Self(parsed.as_str_without_trailing_slash().to_string()))
    }

    /// Returns true if the relay points at the local machine.
    ///
    /// Covers `localhost` and its subdomains, loopback and unspecified IPv4
    /// addresses, and IPv6 loopback including IPv4-mapped loopback.
    #[must_use]
    pub fn is_localhost(&self) -> bool {
        match self.host() {
            Some(RelayHost::Domain(domain)) => {
                domain == "localhost" || domain.ends_with(".localhost")
            }
            Some(RelayHost::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
            Some(RelayHost::Ipv6(ip)) => {
                ip.is_loopback() || ip.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
            }
            None => false,
        }
    }

    /// Returns true if the relay is a Tor hidden service.
    #[must_use]
    pub fn is_onion(&self) -> bool {
        matches!(self.host(), Some(RelayHost::Domain(domain)) if domain.ends_with(".onion"))
    }

    /// Typed host of the URL, with any trailing root dot removed from
    /// domain names.
    ///
    /// Strings that do not parse as relay URLs, such as ones produced by a
    /// custom normalizer, have no host.
    fn host(&self) -> Option<RelayHost> {
        let parsed = nostr::RelayUrl::parse(&self.0).ok()?;

        match parsed.host()? {
            Host::Domain(domain) => Some(RelayHost::Domain(
                domain.trim_end_matches('.').to_ascii_lowercase(),
            )),
            Host::Ipv4(ip) => Some(RelayHost::Ipv4(ip)),
            Host::Ipv6(ip) => Some(RelayHost::Ipv6(ip)),
        }
    }
}

/// Owned host, detached from the parsed URL it came from.
enum RelayHost {
    Domain(String),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
}

impl TryFrom<String> for RelayUrl {
    type Error = CoverageError;

    fn try_from(raw: String) -> CoverageResult<Self> {
        Self::parse(&raw)
    }
}

impl std::str::FromStr for RelayUrl {
    type Err = CoverageError;

    fn from_str(raw: &str) -> CoverageResult<Self> {
        Self::parse(raw)
    }
}

/// Default normalizer for the coverage filter.
///
/// Invalid strings become `None` so the filter can drop them silently.
#[must_use]
pub fn normalize_relay_url(raw: &str) -> Option<RelayUrl> {
    match RelayUrl::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::trace!("Dropping relay URL: {}", e);
            None
        }
    }
}
