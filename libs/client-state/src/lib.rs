//! Client-side state for the Disclist application
//!
//! The server owns the vinyl catalog; the browser owns each user's personal
//! lists (collection, want list, ratings). This crate merges the two: it
//! holds the fetched catalog, loads the signed-in user's persisted list state,
//! and exposes the filtered views and toggle operations the UI renders from.
//!
//! Personal-list state is deliberately never synced to the server. It lives
//! in client-side storage keyed by user id, so clearing storage or switching
//! devices loses it.

pub mod lists;
pub mod reconciler;
pub mod records;
pub mod storage;

pub use lists::{ListEvent, Membership, PersonalLists};
pub use reconciler::{Reconciler, Tab};
pub use records::CatalogRecord;
pub use storage::{MemoryStorage, StateStorage};

use thiserror::Error;

/// Errors surfaced to the UI by state mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// The operation requires a signed-in user; the UI should redirect to
    /// the login view instead of mutating state.
    #[error("sign-in required")]
    LoginRequired,

    /// Ratings are constrained to 1 through 5.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}
