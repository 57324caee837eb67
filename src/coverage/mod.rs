//! Relay coverage selection for the outbox model.
//!
//! Following many users means reading from the relays each of them
//! writes to. Connecting to all of those relays is wasteful, connecting to
//! too few misses events. This module picks a small set of relays that
//! reaches every followed user at least once and, where possible, twice.
//!
//! # Architecture
//!
//! ```text
//! raw relay lists (per user)
//!     │
//!     ▼
//! filter        normalize, drop localhost / disallowed onion
//!     │
//!     ▼
//! UserRelayMap
//!     │
//!     ▼
//! select        reachability pass, then redundancy pass
//!     │           (transpose recomputed every iteration)
//!     ▼
//! RelayPlan     recommendations + unreachable users
//! ```
//!
//! # Determinism
//!
//! All maps are ordered and ties between equally popular relays go to
//! the lexicographically smallest URL, so the same input always yields
//! the same plan.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use outbox_core::coverage::{filter, normalize_relay_url, select, UserId};
//!
//! let raw = vec![
//!     (UserId::new("alice"), vec!["wss://r1.example.com", "wss://r2.example.com"]),
//!     (UserId::new("bob"), vec!["wss://r1.example.com"]),
//! ];
//!
//! let user_map = filter(raw, normalize_relay_url, false);
//! let plan = select(&user_map, &BTreeSet::new());
//!
//! assert_eq!(plan.required().count(), 1);
//! assert_eq!(plan.redundant().count(), 1);
//! ```

mod config;
mod error;
mod filter;
mod selector;
mod transpose;
mod types;
mod url;

pub use config::CoverageConfig;
pub use error::{CoverageError, CoverageResult};
pub use filter::filter;
pub use selector::{select, REDUNDANT_COVERAGE};
pub use transpose::{transpose, transpose_restricted};
pub use types::{RelayPlan, RelayRecommendation, RelayUrl, RelayUserMap, UserId, UserRelayMap};
pub use url::normalize_relay_url;
