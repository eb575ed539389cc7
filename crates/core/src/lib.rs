//! Shared core for the VOD catalog platform
//!
//! Everything the service crates have in common: the domain models, the
//! filter-predicate composer with its SQL rendering, the viewer gating
//! policy (child safety, geo availability), relevance ranking, pagination,
//! validation, the error taxonomy, and the storage traits with their
//! in-memory implementations.
//!
//! Service crates (`vod-discovery`, `vod-playback`) own the HTTP surface
//! and the Postgres implementations of the storage traits.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod pagination;
pub mod policy;
pub mod predicate;
pub mod ranking;
pub mod repository;
pub mod types;
pub mod validation;

pub use error::{CatalogError, Result};
pub use models::{Content, ViewerContext};
pub use pagination::{Page, PageRequest};
pub use predicate::{ContentOrder, ContentPredicate};
pub use types::{AgeRating, ContentStatus, ContentType};
