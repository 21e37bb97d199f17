//! Editor selection state for the taxonomy manager.
//!
//! Deleting a node must not leave the editor pointing at it, so delete
//! operations hand back the removed id and callers clear the matching
//! selection level together with everything below it.

use sea_orm::entity::prelude::Uuid;
use serde::{Deserialize, Serialize};

/// Current selection in a three-level taxonomy editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorSelection {
    pub group: Option<Uuid>,
    pub category: Option<Uuid>,
    pub sub_category: Option<Uuid>,
}

impl EditorSelection {
    /// Selecting a group resets the levels below it.
    pub fn select_group(&mut self, id: Uuid) {
        self.group = Some(id);
        self.category = None;
        self.sub_category = None;
    }

    pub fn select_category(&mut self, id: Uuid) {
        self.category = Some(id);
        self.sub_category = None;
    }

    pub fn select_sub_category(&mut self, id: Uuid) {
        self.sub_category = Some(id);
    }

    /// Clear whichever level holds `deleted`, cascading downwards. A
    /// selection pointing elsewhere is untouched.
    pub fn clear_deleted(&mut self, deleted: Uuid) {
        if self.group == Some(deleted) {
            *self = Self::default();
        } else if self.category == Some(deleted) {
            self.category = None;
            self.sub_category = None;
        } else if self.sub_category == Some(deleted) {
            self.sub_category = None;
        }
    }
}
