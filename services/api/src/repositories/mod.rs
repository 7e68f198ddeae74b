//! Store traits and their Postgres implementations

pub mod user;
pub mod vinyl;

// Re-export for convenience
pub use user::{PgUserStore, UserStore};
pub use vinyl::{PgVinylStore, VinylStore};
