//! Session store abstraction
//!
//! Maps an opaque cookie-carried token to a signed-in user id. The store is
//! injected into the access-control middleware, so backends are swappable:
//! Redis in production, in-memory for single-node deployments and tests.

use anyhow::Result;
use async_trait::async_trait;
use common::cache::RedisPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Generate a fresh opaque session token.
pub fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

/// Server-side session storage keyed by opaque token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a token to the signed-in user id, if the session is live.
    async fn get(&self, token: &str) -> Result<Option<Uuid>>;

    /// Associate a token with a user id for the configured lifetime.
    async fn set(&self, token: &str, user_id: Uuid) -> Result<()>;

    /// Destroy the session for a token. Deleting an unknown token is not
    /// an error.
    async fn delete(&self, token: &str) -> Result<()>;
}

fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Redis-backed session store; expiry is handled by Redis TTLs.
#[derive(Clone)]
pub struct RedisSessionStore {
    redis_pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(redis_pool: RedisPool, ttl_seconds: u64) -> Self {
        Self {
            redis_pool,
            ttl_seconds,
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: &str) -> Result<Option<Uuid>> {
        let value = self.redis_pool.get(&session_key(token)).await?;
        Ok(value.and_then(|raw| Uuid::parse_str(&raw).ok()))
    }

    async fn set(&self, token: &str, user_id: Uuid) -> Result<()> {
        info!("Creating session for user: {}", user_id);
        self.redis_pool
            .set(
                &session_key(token),
                &user_id.to_string(),
                Some(self.ttl_seconds),
            )
            .await?;
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.redis_pool.delete(&session_key(token)).await?;
        Ok(())
    }
}

struct SessionEntry {
    user_id: Uuid,
    expires_at: Instant,
}

/// In-memory session store with lazy expiry on lookup.
#[derive(Clone)]
pub struct InMemorySessionStore {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<Uuid>> {
        let mut entries = self.entries.lock().await;

        match entries.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.user_id)),
            Some(_) => {
                entries.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, token: &str, user_id: Uuid) -> Result<()> {
        info!("Creating session for user: {}", user_id);
        let mut entries = self.entries.lock().await;
        entries.insert(
            token.to_string(),
            SessionEntry {
                user_id,
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(token);
        Ok(())
    }
}
