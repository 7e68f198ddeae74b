//! Personal list state: collection, want list, and ratings
//!
//! Invariant: a vinyl id is never in the collection and the want list at the
//! same time. Adding to one removes it from the other. Leaving the collection
//! also clears the rating for that id.

use crate::StateError;
use crate::storage::StateStorage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Which list a vinyl id currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Collection,
    WantList,
    Neither,
}

/// The single state change produced by a toggle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    AddedToCollection,
    RemovedFromCollection,
    AddedToWantList,
    RemovedFromWantList,
}

/// Per-user list state, persisted as three storage entries keyed by user id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalLists {
    collection: Vec<Uuid>,
    want_list: Vec<Uuid>,
    ratings: HashMap<Uuid, u8>,
}

fn collection_key(user_id: Uuid) -> String {
    format!("disclist_collection_{}", user_id)
}

fn want_list_key(user_id: Uuid) -> String {
    format!("disclist_wantlist_{}", user_id)
}

fn ratings_key(user_id: Uuid) -> String {
    format!("disclist_ratings_{}", user_id)
}

impl PersonalLists {
    /// Load the persisted state for a user. Missing or unreadable entries
    /// fall back to empty, matching a fresh browser profile.
    pub fn load<S: StateStorage>(storage: &S, user_id: Uuid) -> Self {
        let collection = storage
            .get_item(&collection_key(user_id))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let want_list = storage
            .get_item(&want_list_key(user_id))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let ratings = storage
            .get_item(&ratings_key(user_id))
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            collection,
            want_list,
            ratings,
        }
    }

    /// Persist the full state for a user as three JSON entries.
    pub fn save<S: StateStorage>(&self, storage: &mut S, user_id: Uuid) {
        // Serializing Vec<Uuid> and HashMap<Uuid, u8> cannot fail.
        let collection = serde_json::to_string(&self.collection).unwrap_or_default();
        let want_list = serde_json::to_string(&self.want_list).unwrap_or_default();
        let ratings = serde_json::to_string(&self.ratings).unwrap_or_default();

        storage.set_item(&collection_key(user_id), &collection);
        storage.set_item(&want_list_key(user_id), &want_list);
        storage.set_item(&ratings_key(user_id), &ratings);
    }

    pub fn membership(&self, id: Uuid) -> Membership {
        if self.collection.contains(&id) {
            Membership::Collection
        } else if self.want_list.contains(&id) {
            Membership::WantList
        } else {
            Membership::Neither
        }
    }

    pub fn is_in_collection(&self, id: Uuid) -> bool {
        self.collection.contains(&id)
    }

    pub fn is_in_want_list(&self, id: Uuid) -> bool {
        self.want_list.contains(&id)
    }

    pub fn rating(&self, id: Uuid) -> Option<u8> {
        self.ratings.get(&id).copied()
    }

    /// Toggle collection membership. Adding removes the id from the want
    /// list first; removing clears the rating.
    pub fn toggle_collection(&mut self, id: Uuid) -> ListEvent {
        if let Some(index) = self.collection.iter().position(|v| *v == id) {
            self.collection.remove(index);
            self.ratings.remove(&id);
            ListEvent::RemovedFromCollection
        } else {
            self.want_list.retain(|v| *v != id);
            self.collection.push(id);
            ListEvent::AddedToCollection
        }
    }

    /// Toggle want-list membership. Adding removes the id from the
    /// collection first (and clears its rating).
    pub fn toggle_want_list(&mut self, id: Uuid) -> ListEvent {
        if let Some(index) = self.want_list.iter().position(|v| *v == id) {
            self.want_list.remove(index);
            ListEvent::RemovedFromWantList
        } else {
            if self.collection.contains(&id) {
                self.collection.retain(|v| *v != id);
                self.ratings.remove(&id);
            }
            self.want_list.push(id);
            ListEvent::AddedToWantList
        }
    }

    /// Set the rating for a vinyl id, constrained to 1 through 5.
    pub fn set_rating(&mut self, id: Uuid, rating: u8) -> Result<(), StateError> {
        if !(1..=5).contains(&rating) {
            return Err(StateError::InvalidRating(rating));
        }
        self.ratings.insert(id, rating);
        Ok(())
    }
}
