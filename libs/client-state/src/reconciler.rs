//! Merges server catalog data with locally persisted personal-list state
//!
//! The reconciler is the view model behind the catalog screen: it holds the
//! fetched records, the search query, the active tab, and the signed-in
//! user's lists, and derives the displayed subset from all of them. Every
//! list mutation persists the full state immediately.

use crate::StateError;
use crate::lists::{ListEvent, PersonalLists};
use crate::records::CatalogRecord;
use crate::storage::StateStorage;
use uuid::Uuid;

/// Which subset of the catalog the UI is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    All,
    Collection,
    WantList,
}

/// Client-side state reconciler.
#[derive(Debug)]
pub struct Reconciler<S: StateStorage> {
    storage: S,
    records: Vec<CatalogRecord>,
    lists: PersonalLists,
    user_id: Option<Uuid>,
    search_query: String,
    active_tab: Tab,
}

impl<S: StateStorage> Reconciler<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            records: Vec::new(),
            lists: PersonalLists::default(),
            user_id: None,
            search_query: String::new(),
            active_tab: Tab::default(),
        }
    }

    /// Replace the catalog with freshly fetched records.
    pub fn set_records(&mut self, records: Vec<CatalogRecord>) {
        self.records = records;
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// A session check succeeded: remember the user and load their
    /// persisted lists.
    pub fn session_resolved(&mut self, user_id: Uuid) {
        self.user_id = Some(user_id);
        self.lists = PersonalLists::load(&self.storage, user_id);
    }

    /// The user signed out: clear in-memory state and reset the tab.
    /// Persisted storage is left intact for the next sign-in.
    pub fn logged_out(&mut self) {
        self.user_id = None;
        self.lists = PersonalLists::default();
        self.active_tab = Tab::All;
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Switch tabs. The personal tabs require a signed-in user; selecting
    /// one while signed out still switches but reports that the UI should
    /// show the login view.
    pub fn select_tab(&mut self, tab: Tab) -> Result<(), StateError> {
        self.active_tab = tab;
        if tab != Tab::All && self.user_id.is_none() {
            return Err(StateError::LoginRequired);
        }
        Ok(())
    }

    /// Records matching the search query, case-insensitively, on album,
    /// artist, and version. A record without a version only skips the
    /// version sub-check.
    pub fn filtered(&self) -> Vec<&CatalogRecord> {
        if self.search_query.is_empty() {
            return self.records.iter().collect();
        }

        let query = self.search_query.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record.album.to_lowercase().contains(&query)
                    || record.artist.to_lowercase().contains(&query)
                    || record
                        .vinyl_version
                        .as_ref()
                        .is_some_and(|version| version.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// The filtered records further restricted by the active tab.
    pub fn displayed(&self) -> Vec<&CatalogRecord> {
        let filtered = self.filtered();
        match self.active_tab {
            Tab::All => filtered,
            Tab::Collection => filtered
                .into_iter()
                .filter(|record| self.lists.is_in_collection(record.id))
                .collect(),
            Tab::WantList => filtered
                .into_iter()
                .filter(|record| self.lists.is_in_want_list(record.id))
                .collect(),
        }
    }

    pub fn is_in_collection(&self, id: Uuid) -> bool {
        self.lists.is_in_collection(id)
    }

    pub fn is_in_want_list(&self, id: Uuid) -> bool {
        self.lists.is_in_want_list(id)
    }

    pub fn rating(&self, id: Uuid) -> Option<u8> {
        self.lists.rating(id)
    }

    /// Toggle collection membership for the signed-in user and persist.
    pub fn toggle_collection(&mut self, id: Uuid) -> Result<ListEvent, StateError> {
        if self.user_id.is_none() {
            return Err(StateError::LoginRequired);
        }
        let event = self.lists.toggle_collection(id);
        self.persist();
        Ok(event)
    }

    /// Toggle want-list membership for the signed-in user and persist.
    pub fn toggle_want_list(&mut self, id: Uuid) -> Result<ListEvent, StateError> {
        if self.user_id.is_none() {
            return Err(StateError::LoginRequired);
        }
        let event = self.lists.toggle_want_list(id);
        self.persist();
        Ok(event)
    }

    /// Rate a vinyl (1 through 5) and persist.
    pub fn set_rating(&mut self, id: Uuid, rating: u8) -> Result<(), StateError> {
        if self.user_id.is_none() {
            return Err(StateError::LoginRequired);
        }
        self.lists.set_rating(id, rating)?;
        self.persist();
        Ok(())
    }

    fn persist(&mut self) {
        if let Some(user_id) = self.user_id {
            self.lists.save(&mut self.storage, user_id);
        }
    }

    /// The backing storage, for hosts that share it across views.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
