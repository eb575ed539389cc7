//! Discovery service: catalog browsing, search, shelves, and management
//!
//! Read paths are viewer-gated through `vod_core::policy`; management
//! paths are admin-gated with a JWT role claim.

pub mod admin;
pub mod catalog;
pub mod repository;
pub mod search;
pub mod server;
pub mod shelves;
