//! Two-pass greedy relay selection.
//!
//! The selector solves a small set-cover problem: pick few relays such
//! that every followed user is readable from at least one of them, then
//! add relays so that as many users as possible are readable from two.
//!
//! # Passes
//!
//! | Pass | Users considered | Output flag |
//! |------|------------------|-------------|
//! | Reachability | users with no selected relay | `required_to_not_miss_events = true` |
//! | Redundancy | users with fewer than two selected relays | `required_to_not_miss_events = false` |
//!
//! Each iteration recomputes relay popularity over the users still
//! waiting, ignoring relays already selected, and picks the most popular
//! relay. Ties go to the lexicographically smallest URL so identical
//! inputs always yield identical plans.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::transpose::transpose_restricted;
use super::types::{RelayPlan, RelayRecommendation, RelayUrl, RelayUserMap, UserId, UserRelayMap};

/// Number of independent selected relays the redundancy pass aims for.
pub const REDUNDANT_COVERAGE: usize = 2;

/// Selects relays covering every user in `user_map`.
///
/// Relays in `pre_selected` count as already chosen: users they serve are
/// skipped by the reachability pass and the relays themselves are never
/// recommended. They still count toward redundancy.
///
/// Users left without any selected relay are reported in
/// [`RelayPlan::unreachable`].
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use outbox_core::coverage::{select, RelayUrl, UserId, UserRelayMap};
///
/// let r1 = RelayUrl::from_canonical("wss://r1.example.com");
/// let mut user_map = UserRelayMap::new();
/// user_map.insert(UserId::new("alice"), [r1.clone()].into_iter().collect());
///
/// let plan = select(&user_map, &BTreeSet::new());
/// assert_eq!(plan.recommendations.len(), 1);
/// assert!(plan.recommendations[0].required_to_not_miss_events);
/// assert!(plan.unreachable.is_empty());
/// ```
#[must_use]
pub fn select(user_map: &UserRelayMap, pre_selected: &BTreeSet<RelayUrl>) -> RelayPlan {
    let mut selected = pre_selected.clone();
    let mut recommendations = Vec::new();

    let pending: BTreeSet<UserId> = user_map
        .iter()
        .filter(|(_, relays)| relays.is_disjoint(pre_selected))
        .map(|(user, _)| user.clone())
        .collect();

    tracing::debug!(
        "Reachability pass: {} of {} users pending, {} relays pre-selected",
        pending.len(),
        user_map.len(),
        pre_selected.len()
    );
    greedy_pass(user_map, pending, &mut selected, true, &mut recommendations);

    let shortfall: BTreeSet<UserId> = user_map
        .iter()
        .filter(|(_, relays)| selected_count(relays, &selected) < REDUNDANT_COVERAGE)
        .map(|(user, _)| user.clone())
        .collect();

    tracing::debug!(
        "Redundancy pass: {} users below {} selected relays",
        shortfall.len(),
        REDUNDANT_COVERAGE
    );
    greedy_pass(user_map, shortfall, &mut selected, false, &mut recommendations);

    let unreachable: BTreeSet<UserId> = user_map
        .iter()
        .filter(|(_, relays)| relays.is_disjoint(&selected))
        .map(|(user, _)| user.clone())
        .collect();

    if !unreachable.is_empty() {
        tracing::debug!("{} users have no usable relay", unreachable.len());
    }

    RelayPlan {
        recommendations,
        selected,
        unreachable,
    }
}

/// Runs one greedy pass until `waiting` is empty or no relay helps.
fn greedy_pass(
    user_map: &UserRelayMap,
    mut waiting: BTreeSet<UserId>,
    selected: &mut BTreeSet<RelayUrl>,
    required: bool,
    recommendations: &mut Vec<RelayRecommendation>,
) {
    while !waiting.is_empty() {
        let popularity = transpose_restricted(user_map, &waiting, selected);

        let Some((url, users)) = most_popular(popularity) else {
            break;
        };

        // A pick must resolve at least one waiting user.
        if users.is_disjoint(&waiting) {
            break;
        }

        tracing::debug!(
            "Picked {} ({} users, required: {})",
            url,
            users.len(),
            required
        );

        waiting.retain(|user| !users.contains(user));
        selected.insert(url.clone());
        recommendations.push(RelayRecommendation {
            url,
            required_to_not_miss_events: required,
            users,
        });
    }
}

/// Relay with the most users; ties go to the smallest URL.
fn most_popular(popularity: RelayUserMap) -> Option<(RelayUrl, BTreeSet<UserId>)> {
    popularity.into_iter().max_by(|(a_url, a_users), (b_url, b_users)| {
        match a_users.len().cmp(&b_users.len()) {
            // Reverse URL order so the smaller URL compares as the maximum.
            Ordering::Equal => b_url.cmp(a_url),
            other => other,
        }
    })
}

fn selected_count(relays: &BTreeSet<RelayUrl>, selected: &BTreeSet<RelayUrl>) -> usize {
    relays.intersection(selected).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relay(name: &str) -> RelayUrl {
        RelayUrl::from_canonical(format!("wss://{name}.example.com"))
    }

    fn user_map(entries: &[(&str, &[&str])]) -> UserRelayMap {
        entries
            .iter()
            .map(|(user, relays)| {
                (
                    UserId::new(*user),
                    relays.iter().map(|r| relay(r)).collect(),
                )
            })
            .collect()
    }

    fn users(ids: &[&str]) -> BTreeSet<UserId> {
        ids.iter().map(|id| UserId::new(*id)).collect()
    }

    fn relays(names: &[&str]) -> BTreeSet<RelayUrl> {
        names.iter().map(|name| relay(name)).collect()
    }

    fn worked_example() -> UserRelayMap {
        user_map(&[
            ("alice", &["r1", "r2"]),
            ("bob", &["r1"]),
            ("carol", &["r2", "r3"]),
            ("dave", &["r3"]),
        ])
    }

    #[test]
    fn worked_example_picks_r1_r3_then_r2() {
        let plan = select(&worked_example(), &BTreeSet::new());

        assert_eq!(
            plan.recommendations,
            vec![
                RelayRecommendation {
                    url: relay("r1"),
                    required_to_not_miss_events: true,
                    users: users(&["alice", "bob"]),
                },
                RelayRecommendation {
                    url: relay("r3"),
                    required_to_not_miss_events: true,
                    users: users(&["carol", "dave"]),
                },
                RelayRecommendation {
                    url: relay("r2"),
                    required_to_not_miss_events: false,
                    users: users(&["alice", "carol"]),
                },
            ]
        );
        assert_eq!(plan.selected, relays(&["r1", "r2", "r3"]));
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn empty_input_yields_empty_plan() {
        let plan = select(&UserRelayMap::new(), &BTreeSet::new());
        assert!(plan.is_empty());
        assert!(plan.selected.is_empty());
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn tie_breaks_on_smallest_url() {
        let map = user_map(&[("alice", &["zeta", "alpha", "mu"])]);

        let plan = select(&map, &BTreeSet::new());

        assert_eq!(plan.recommendations[0].url, relay("alpha"));
        assert_eq!(plan.recommendations[1].url, relay("mu"));
        assert_eq!(plan.recommendations.len(), 2);
    }

    #[test]
    fn most_popular_beats_smaller_url() {
        let map = user_map(&[
            ("alice", &["a", "z"]),
            ("bob", &["z"]),
            ("carol", &["z"]),
        ]);

        let plan = select(&map, &BTreeSet::new());

        assert_eq!(plan.recommendations[0].url, relay("z"));
        assert_eq!(
            plan.recommendations[0].users,
            users(&["alice", "bob", "carol"])
        );
    }

    #[test]
    fn users_without_relays_are_unreachable() {
        let map = user_map(&[("alice", &["r1"]), ("ghost", &[])]);

        let plan = select(&map, &BTreeSet::new());

        assert_eq!(plan.unreachable, users(&["ghost"]));
        assert!(plan
            .recommendations
            .iter()
            .all(|r| !r.users.contains(&UserId::new("ghost"))));
    }

    #[test]
    fn pre_selected_relays_are_not_recommended() {
        let plan = select(&worked_example(), &relays(&["r2"]));

        assert!(plan.recommendation(&relay("r2")).is_none());
        assert!(plan.selected.contains(&relay("r2")));

        // alice and carol are served by r2, so only bob and dave are pending.
        let required: Vec<_> = plan.required().map(|r| r.url.clone()).collect();
        assert_eq!(required, vec![relay("r1"), relay("r3")]);
        assert_eq!(plan.recommendations[0].users, users(&["bob"]));
        assert_eq!(plan.recommendations[1].users, users(&["dave"]));
    }

    #[test]
    fn pre_selected_relays_count_toward_redundancy() {
        let map = user_map(&[("alice", &["r1", "r2", "r3"])]);

        let plan = select(&map, &relays(&["r1", "r2"]));

        assert!(plan.is_empty());
        assert_eq!(plan.selected, relays(&["r1", "r2"]));
    }

    #[test]
    fn pre_selected_relay_nobody_uses_is_harmless() {
        let plan = select(&worked_example(), &relays(&["unused"]));

        assert_eq!(plan.recommendations.len(), 3);
        assert!(plan.selected.contains(&relay("unused")));
    }

    #[test]
    fn single_relay_users_stay_singly_covered() {
        let map = user_map(&[("bob", &["r1"])]);

        let plan = select(&map, &BTreeSet::new());

        assert_eq!(plan.recommendations.len(), 1);
        assert_eq!(plan.redundant().count(), 0);
    }

    #[test]
    fn redundancy_pass_gives_second_relay() {
        let map = user_map(&[("alice", &["r1", "r2"]), ("bob", &["r1", "r2"])]);

        let plan = select(&map, &BTreeSet::new());

        let required: Vec<_> = plan.required().collect();
        let redundant: Vec<_> = plan.redundant().collect();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].url, relay("r1"));
        assert_eq!(redundant.len(), 1);
        assert_eq!(redundant[0].url, relay("r2"));
        assert_eq!(redundant[0].users, users(&["alice", "bob"]));
    }

    #[test]
    fn redundancy_stops_at_two_relays() {
        let map = user_map(&[("alice", &["r1", "r2", "r3", "r4"])]);

        let plan = select(&map, &BTreeSet::new());

        assert_eq!(plan.selected, relays(&["r1", "r2"]));
    }

    #[test]
    fn marginal_users_only_include_newly_resolved() {
        let map = user_map(&[
            ("alice", &["r1", "r2"]),
            ("bob", &["r1", "r2"]),
            ("carol", &["r2"]),
        ]);

        let plan = select(&map, &BTreeSet::new());

        // r2 reaches all three and is picked first; r1 then only serves
        // alice and bob as their second relay.
        assert_eq!(plan.recommendations[0].url, relay("r2"));
        assert_eq!(
            plan.recommendations[0].users,
            users(&["alice", "bob", "carol"])
        );
        let r1 = plan.recommendation(&relay("r1")).expect("r1 should be picked");
        assert!(!r1.required_to_not_miss_events);
        assert_eq!(r1.users, users(&["alice", "bob"]));
    }

    #[test]
    fn selection_is_deterministic() {
        let map = worked_example();
        let first = select(&map, &BTreeSet::new());
        let second = select(&map, &BTreeSet::new());
        assert_eq!(first, second);
    }

    #[test]
    fn most_popular_on_empty_map_is_none() {
        assert!(most_popular(RelayUserMap::new()).is_none());
    }
}
