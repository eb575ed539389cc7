//! Playback service: watch progress, continue-watching, watchlist, likes
//!
//! Writes are per-profile and idempotent where the data model allows it;
//! reads that surface catalog records route through the same viewer gates
//! as the discovery service.

pub mod continue_watching;
pub mod history;
pub mod repository;
pub mod server;
pub mod watchlist;
