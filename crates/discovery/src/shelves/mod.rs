//! Shelf grouping for the browse screen

pub mod handlers;
pub mod service;

pub use service::{ShelfBrowse, ShelfBrowseService, ShelfView};
