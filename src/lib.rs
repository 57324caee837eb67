//! Outbox Core Library
//!
//! Relay selection for Nostr clients that follow many users.
//! This crate decides which relays to read from so that every followed
//! user is reachable, with a second independent relay where possible.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod coverage;

pub use api::RelayPlanner;
