//! Domain models for the VOD catalog platform

pub mod content;
pub mod history;
pub mod shelf;
pub mod viewer;

pub use content::{Content, Episode, Season};
pub use history::{ContentLike, WatchHistory, WatchlistEntry, COMPLETION_THRESHOLD};
pub use shelf::{Shelf, ShelfEntry};
pub use viewer::{ProfileContextEcho, ViewerContext};
