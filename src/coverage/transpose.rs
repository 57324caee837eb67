//! Inversion of the user → relays map.

use std::collections::BTreeSet;

use super::types::{RelayUrl, RelayUserMap, UserId, UserRelayMap};

/// Builds the relay → users map, skipping relays in `ignore`.
///
/// Ignored relays never appear as keys, not even with an empty user set.
#[must_use]
pub fn transpose(user_map: &UserRelayMap, ignore: &BTreeSet<RelayUrl>) -> RelayUserMap {
    invert(user_map.iter(), ignore)
}

/// Like [`transpose`], but only for the users in `users`.
///
/// Equivalent to restricting `user_map` to `users` first, without cloning
/// the restricted map.
#[must_use]
pub fn transpose_restricted(
    user_map: &UserRelayMap,
    users: &BTreeSet<UserId>,
    ignore: &BTreeSet<RelayUrl>,
) -> RelayUserMap {
    invert(
        users
            .iter()
            .filter_map(|user| user_map.get_key_value(user)),
        ignore,
    )
}

fn invert<'a>(
    entries: impl Iterator<Item = (&'a UserId, &'a BTreeSet<RelayUrl>)>,
    ignore: &BTreeSet<RelayUrl>,
) -> RelayUserMap {
    let mut relays = RelayUserMap::new();

    for (user, urls) in entries {
        for url in urls.iter().filter(|url| !ignore.contains(*url)) {
            relays.entry(url.clone()).or_default().insert(user.clone());
        }
    }

    relays
}
