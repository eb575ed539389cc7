//! Free-text catalog search with relevance ranking

pub mod handlers;
pub mod service;

pub use service::SearchService;
