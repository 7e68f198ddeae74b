//! Catalog wire models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One vinyl record as fetched from `GET /vinyls`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    pub id: Uuid,
    pub vinyl_cover: Option<String>,
    pub vinyl_version: Option<String>,
    pub album: String,
    pub artist: String,
    #[serde(default)]
    pub songs: i64,
    pub upc: Option<i64>,
}
