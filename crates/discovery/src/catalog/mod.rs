//! Catalog listings: browse, kids, featured, upcoming, watching-now, detail

pub mod handlers;
pub mod service;
pub mod types;

pub use service::CatalogQueryService;
pub use types::{ContentDetail, ListQuery, ListRequest, Listing, WatchedItem};
