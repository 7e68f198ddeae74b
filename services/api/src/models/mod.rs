//! API models for entities and request payloads

pub mod user;
pub mod vinyl;

// Re-export for convenience
pub use user::{LoginRequest, NewUser, NewUserRequest, User, hash_password};
pub use vinyl::{Vinyl, VinylPayload};
