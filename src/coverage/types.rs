//! Types for relay coverage planning.
//!
//! This module defines the identifiers, maps and output records shared by
//! the filter, the transposer and the selector. Maps are ordered so that
//! every traversal, and therefore every plan, is reproducible.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use nostr::PublicKey;
use serde::{Deserialize, Serialize};

use super::transpose::transpose;

/// Opaque identifier of a followed user.
///
/// Usually the hex encoding of the user's public key. The coverage code
/// only compares and orders identifiers, it never looks inside them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user identifier from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PublicKey> for UserId {
    fn from(public_key: PublicKey) -> Self {
        Self(public_key.to_hex())
    }
}

impl From<&PublicKey> for UserId {
    fn from(public_key: &PublicKey) -> Self {
        Self(public_key.to_hex())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical relay endpoint.
///
/// Two raw URLs that normalize to the same string are the same relay.
/// Equality, ordering and hashing all use the canonical string, so the
/// lexicographic order of `RelayUrl` is the order used to break ties.
///
/// Use [`RelayUrl::parse`] to normalize a raw string, or
/// [`RelayUrl::from_canonical`] when an external normalizer already
/// produced the canonical form.
///
/// Serialized as the bare canonical string and read back unchanged, so
/// plans built with any normalizer survive a JSON round-trip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelayUrl(pub(super) String);

impl RelayUrl {
    /// Wraps a string that is already in canonical form.
    ///
    /// No validation is performed.
    #[must_use]
    pub fn from_canonical(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the canonical URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelayUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RelayUrl> for String {
    fn from(url: RelayUrl) -> Self {
        url.0
    }
}

/// Relays each user can be read from.
pub type UserRelayMap = BTreeMap<UserId, BTreeSet<RelayUrl>>;

/// Users reachable at each relay.
pub type RelayUserMap = BTreeMap<RelayUrl, BTreeSet<UserId>>;

/// A relay picked by the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRecommendation {
    /// The relay URL.
    pub url: RelayUrl,
    /// True when the relay was picked in the reachability pass.
    ///
    /// Dropping such a relay leaves at least one user with no source.
    /// False means it only adds a second path for users already covered.
    pub required_to_not_miss_events: bool,
    /// Users this relay resolved at the moment it was picked.
    ///
    /// This is the marginal contribution, not every user writing to the
    /// relay. See [`RelayPlan::subscriptions`] for the full assignment.
    pub users: BTreeSet<UserId>,
}

/// Output of one selector run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPlan {
    /// Picked relays in pick order; reachability picks come first.
    pub recommendations: Vec<RelayRecommendation>,
    /// Pre-selected relays plus every picked relay.
    pub selected: BTreeSet<RelayUrl>,
    /// Users with no relay in `selected`.
    pub unreachable: BTreeSet<UserId>,
}

impl RelayPlan {
    /// Returns true if no relay was recommended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Returns the recommendation for `url`, if it was picked.
    #[must_use]
    pub fn recommendation(&self, url: &RelayUrl) -> Option<&RelayRecommendation> {
        self.recommendations.iter().find(|r| &r.url == url)
    }

    /// Recommendations picked in the reachability pass.
    pub fn required(&self) -> impl Iterator<Item = &RelayRecommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.required_to_not_miss_events)
    }

    /// Recommendations picked in the redundancy pass.
    pub fn redundant(&self) -> impl Iterator<Item = &RelayRecommendation> {
        self.recommendations
            .iter()
            .filter(|r| !r.required_to_not_miss_events)
    }

    /// Urls of the recommended relays, excluding pre-selected ones.
    pub fn recommended_urls(&self) -> impl Iterator<Item = &RelayUrl> {
        self.recommendations.iter().map(|r| &r.url)
    }

    /// Per-relay author assignment for the subscription layer.
    ///
    /// For every selected relay, lists all users in `user_map` that write
    /// there. Selected relays nobody writes to are omitted.
    #[must_use]
    pub fn subscriptions(&self, user_map: &UserRelayMap) -> RelayUserMap {
        let mut assignment = transpose(user_map, &BTreeSet::new());
        assignment.retain(|url, _| self.selected.contains(url));
        assignment
    }
}
