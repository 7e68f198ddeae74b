//! Common library for the Disclist application
//!
//! This crate provides shared infrastructure used by the Disclist services:
//! PostgreSQL connection handling, the Redis pool backing server-side
//! sessions, and common error types.

pub mod cache;
pub mod database;
pub mod error;
