//! Stores picked for messaging.

use serde::{Deserialize, Serialize};

use crate::ids::StoreId;

/// Up to [`StoreSelection::CAPACITY`] store ids, oldest first.
///
/// Picking a store when the selection is full evicts the oldest pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StoreId>", into = "Vec<StoreId>")]
pub struct StoreSelection {
    ids: Vec<StoreId>,
}

impl StoreSelection {
    /// Maximum number of stores messaged at once.
    pub const CAPACITY: usize = 2;

    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` if selected, otherwise select it.
    ///
    /// Returns the id evicted to make room, if any.
    pub fn toggle(&mut self, id: StoreId) -> Option<StoreId> {
        if let Some(pos) = self.ids.iter().position(|s| s == &id) {
            self.ids.remove(pos);
            return None;
        }

        let evicted = if self.ids.len() >= Self::CAPACITY {
            Some(self.ids.remove(0))
        } else {
            None
        };
        self.ids.push(id);
        evicted
    }

    pub fn contains(&self, id: &StoreId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[StoreId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl TryFrom<Vec<StoreId>> for StoreSelection {
    type Error = String;

    fn try_from(ids: Vec<StoreId>) -> Result<Self, Self::Error> {
        if ids.len() > Self::CAPACITY {
            return Err(format!(
                "at most {} stores may be selected, got {}",
                Self::CAPACITY,
                ids.len()
            ));
        }
        let mut selection = Self::new();
        for id in ids {
            if selection.contains(&id) {
                return Err(format!("store {id} selected twice"));
            }
            selection.ids.push(id);
        }
        Ok(selection)
    }
}

impl From<StoreSelection> for Vec<StoreId> {
    fn from(selection: StoreSelection) -> Self {
        selection.ids
    }
}
