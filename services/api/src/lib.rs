//! Disclist API service
//!
//! Session-cookie authentication, role-gated catalog CRUD, and cover image
//! uploads to S3. Store access goes through trait seams so handlers can be
//! exercised against in-memory backends in tests.

pub mod config;
pub mod error;
pub mod image_store;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
