//! Request and response bodies shared by the HTTP server and its clients.
//!
//! Rich catalog documents (ingredients, recipes) travel as the engine's
//! own serde types; this crate only carries the thin envelopes around
//! them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod taxonomy {
    use super::*;

    /// Request body for creating a major group.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
        #[serde(default)]
        pub icon: String,
        #[serde(default)]
        pub color: String,
    }

    /// Request body for creating a category or sub-category under a
    /// parent node.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NodeNew {
        pub parent_id: Uuid,
        pub name: String,
        pub description: Option<String>,
    }

    /// Request body for renaming any taxonomy node.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NodeRename {
        pub name: String,
        pub description: Option<String>,
    }

    /// Direction for moving a node among its siblings.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Direction {
        Up,
        Down,
    }

    /// Request body for reordering a node.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct NodeReorder {
        pub direction: Direction,
    }

    /// Response body for deletes: the id callers should drop from any
    /// editor selection.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deleted {
        pub id: Uuid,
    }
}

pub mod import {
    use super::*;

    /// Spreadsheet rows as column label to raw cell value.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportRows {
        pub rows: Vec<HashMap<String, String>>,
    }

    /// Import outcome.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ImportResult {
        pub applied: usize,
    }
}

pub mod recipe {
    use super::*;

    /// Query parameters for recipe listings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecipeList {
        /// `prepared` or `final`; omitted means both.
        pub recipe_type: Option<String>,
        /// Case-insensitive substring over name, category, sub-category.
        pub search: Option<String>,
    }

    /// Response body for the validate endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ValidationReport {
        pub errors: Vec<String>,
    }

    /// Response body for seeding recipes from prepared items.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Seeded {
        pub created: usize,
    }
}
