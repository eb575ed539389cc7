//! Shelf models: named, ordered content collections
//!
//! A shelf (e.g. "Action Adventures") groups content for the browse screen.
//! Shelf order and per-shelf content order are both explicit display orders;
//! ties break by id so pagination and rendering stay deterministic.
//!
//! ## Database schema
//!
//! ```sql
//! CREATE TABLE shelves (
//!     id UUID PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     display_order INT NOT NULL DEFAULT 0,
//!     show_on_child_profile BOOLEAN NOT NULL DEFAULT FALSE,
//!     is_active BOOLEAN NOT NULL DEFAULT TRUE
//! );
//!
//! CREATE TABLE shelf_entries (
//!     shelf_id UUID NOT NULL REFERENCES shelves(id),
//!     content_id UUID NOT NULL REFERENCES content(id),
//!     display_order INT NOT NULL DEFAULT 0,
//!     is_featured BOOLEAN NOT NULL DEFAULT FALSE,
//!     PRIMARY KEY (shelf_id, content_id)
//! );
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, ordered content collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    pub id: Uuid,
    pub name: String,
    pub display_order: i32,
    /// Whether the shelf is visible to child profiles at all
    pub show_on_child_profile: bool,
    pub is_active: bool,
}

impl Shelf {
    pub fn new(name: impl Into<String>, display_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_order,
            show_on_child_profile: false,
            is_active: true,
        }
    }
}

/// Membership of one content record in one shelf
///
/// Carries its own display order and featured flag, governing where the
/// title appears within that shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShelfEntry {
    pub shelf_id: Uuid,
    pub content_id: Uuid,
    pub display_order: i32,
    pub is_featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_defaults() {
        let shelf = Shelf::new("Action Adventures", 3);
        assert_eq!(shelf.name, "Action Adventures");
        assert_eq!(shelf.display_order, 3);
        assert!(shelf.is_active);
        assert!(!shelf.show_on_child_profile);
    }
}
