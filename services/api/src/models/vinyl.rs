//! Vinyl catalog models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One vinyl record in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vinyl {
    pub id: Uuid,
    pub vinyl_cover: Option<String>,
    pub vinyl_version: Option<String>,
    pub album: String,
    pub artist: String,
    pub songs: i64,
    pub upc: Option<i64>,
}

/// Create/update request body. Updates overwrite every field from this
/// payload; there are no partial-patch semantics.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VinylPayload {
    #[serde(default)]
    pub vinyl_cover: Option<String>,
    #[serde(default)]
    pub vinyl_version: Option<String>,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub songs: i64,
    #[serde(default)]
    pub upc: Option<i64>,
}
