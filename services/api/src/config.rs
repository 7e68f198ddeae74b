//! Service configuration

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Name of the session cookie
    pub cookie_name: String,
    /// Server-side session lifetime in seconds
    pub session_ttl_seconds: u64,
    /// S3 bucket holding vinyl cover images
    pub bucket_name: String,
    /// AWS region the bucket lives in
    pub region: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_ADDR`: bind address (default: "0.0.0.0:8080")
    /// - `SESSION_COOKIE_NAME`: session cookie name (default: "disclist_session")
    /// - `SESSION_TTL_SECONDS`: session lifetime (default: 604800, 7 days)
    /// - `VINYL_BUCKET_NAME`: cover image bucket (default: "vinylphotos")
    /// - `AWS_REGION`: bucket region (default: "us-west-2")
    pub fn from_env() -> Self {
        let bind_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "disclist_session".to_string());
        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604_800);
        let bucket_name =
            env::var("VINYL_BUCKET_NAME").unwrap_or_else(|_| "vinylphotos".to_string());
        let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-west-2".to_string());

        Self {
            bind_addr,
            cookie_name,
            session_ttl_seconds,
            bucket_name,
            region,
        }
    }
}
