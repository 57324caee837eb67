//! Shared builders for coverage integration tests.
//!
//! Relays are named by short labels (`r1`, `r2`, ...) and expanded to
//! canonical URLs so lexicographic order matches label order.

#![allow(dead_code)]

use std::collections::BTreeSet;

use outbox_core::coverage::{RelayUrl, UserId, UserRelayMap};

/// Canonical URL for a short relay label.
pub fn relay(label: &str) -> RelayUrl {
    RelayUrl::from_canonical(format!("wss://{label}.example.com"))
}

/// Set of canonical URLs for the given labels.
pub fn relays(labels: &[&str]) -> BTreeSet<RelayUrl> {
    labels.iter().map(|label| relay(label)).collect()
}

/// Set of user identifiers.
pub fn users(ids: &[&str]) -> BTreeSet<UserId> {
    ids.iter().map(|id| UserId::new(*id)).collect()
}

/// Builds a user → relays map from `(user, relay labels)` pairs.
pub fn user_map(entries: &[(&str, &[&str])]) -> UserRelayMap {
    entries
        .iter()
        .map(|(user, labels)| (UserId::new(*user), relays(labels)))
        .collect()
}

/// Raw relay lists in the shape the filter and planner accept.
pub fn raw_lists(entries: &[(&str, &[&str])]) -> Vec<(UserId, Vec<String>)> {
    entries
        .iter()
        .map(|(user, urls)| {
            (
                UserId::new(*user),
                urls.iter().map(|url| (*url).to_string()).collect(),
            )
        })
        .collect()
}

/// Number of relays in `selected` that `user` writes to.
pub fn coverage_of(user_map: &UserRelayMap, user: &UserId, selected: &BTreeSet<RelayUrl>) -> usize {
    user_map
        .get(user)
        .map_or(0, |urls| urls.intersection(selected).count())
}
