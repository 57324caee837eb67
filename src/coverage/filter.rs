//! Cleanup of raw relay lists before selection.
//!
//! Users advertise whatever they like in their relay lists. The filter
//! keeps only relays the client can actually use and never fails: a bad
//! entry simply means the user has one fewer relay.

use std::collections::BTreeSet;

use super::types::{RelayUrl, UserId, UserRelayMap};

/// Builds the user → relays map from raw relay lists.
///
/// An entry is dropped when `normalize` returns `None`, when it points at
/// localhost, or when it is an onion address and `onion_allowed` is false.
/// Duplicates collapse to one relay per canonical URL.
///
/// Users whose every entry is dropped stay in the map with an empty set.
///
/// # Arguments
///
/// * `raw_lists` - Raw write-relay strings per user
/// * `normalize` - Turns a raw string into a canonical relay URL
/// * `onion_allowed` - Whether the client can reach onion relays
///
/// # Example
///
/// ```
/// use outbox_core::coverage::{filter, normalize_relay_url, UserId};
///
/// let raw = vec![(
///     UserId::new("alice"),
///     vec!["wss://nos.lol/".to_string(), "ws://localhost:7777".to_string()],
/// )];
///
/// let map = filter(raw, normalize_relay_url, false);
/// assert_eq!(map[&UserId::new("alice")].len(), 1);
/// ```
pub fn filter<I, S, F>(raw_lists: I, normalize: F, onion_allowed: bool) -> UserRelayMap
where
    I: IntoIterator<Item = (UserId, Vec<S>)>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<RelayUrl>,
{
    let mut user_map = UserRelayMap::new();

    for (user, raw_relays) in raw_lists {
        let relays: BTreeSet<RelayUrl> = raw_relays
            .iter()
            .filter_map(|raw| accept(raw.as_ref(), &normalize, onion_allowed))
            .collect();

        if relays.is_empty() {
            tracing::trace!("User {} has no usable relays", user);
        }

        user_map.entry(user).or_default().extend(relays);
    }

    user_map
}

fn accept<F>(raw: &str, normalize: &F, onion_allowed: bool) -> Option<RelayUrl>
where
    F: Fn(&str) -> Option<RelayUrl>,
{
    let url = normalize(raw)?;

    if url.is_localhost() {
        tracing::trace!("Dropping localhost relay {}", url);
        return None;
    }

    if url.is_onion() && !onion_allowed {
        tracing::trace!("Dropping onion relay {} (onion not allowed)", url);
        return None;
    }

    Some(url)
}
