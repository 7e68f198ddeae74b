//! Catalog store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::models::{Vinyl, VinylPayload};

/// Persistent vinyl catalog storage.
#[async_trait]
pub trait VinylStore: Send + Sync {
    /// All records, unpaginated. A full scan is acceptable at catalog scale.
    async fn list(&self) -> Result<Vec<Vinyl>>;

    /// Find a record by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vinyl>>;

    /// Insert a new record.
    async fn insert(&self, payload: &VinylPayload) -> Result<Vinyl>;

    /// Overwrite every field of an existing record. Returns `None` when the
    /// record does not exist.
    async fn update(&self, id: Uuid, payload: &VinylPayload) -> Result<Option<Vinyl>>;

    /// Delete a record. Returns false when the record does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Postgres-backed vinyl store
#[derive(Clone)]
pub struct PgVinylStore {
    pool: PgPool,
}

impl PgVinylStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn vinyl_from_row(row: &PgRow) -> Vinyl {
    Vinyl {
        id: row.get("id"),
        vinyl_cover: row.get("vinyl_cover"),
        vinyl_version: row.get("vinyl_version"),
        album: row.get("album"),
        artist: row.get("artist"),
        songs: row.get("songs"),
        upc: row.get("upc"),
    }
}

#[async_trait]
impl VinylStore for PgVinylStore {
    async fn list(&self) -> Result<Vec<Vinyl>> {
        let rows = sqlx::query(
            r#"
            SELECT id, vinyl_cover, vinyl_version, album, artist, songs, upc
            FROM vinyls
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(vinyl_from_row).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vinyl>> {
        let row = sqlx::query(
            r#"
            SELECT id, vinyl_cover, vinyl_version, album, artist, songs, upc
            FROM vinyls
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(vinyl_from_row))
    }

    async fn insert(&self, payload: &VinylPayload) -> Result<Vinyl> {
        let row = sqlx::query(
            r#"
            INSERT INTO vinyls (vinyl_cover, vinyl_version, album, artist, songs, upc)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, vinyl_cover, vinyl_version, album, artist, songs, upc
            "#,
        )
        .bind(&payload.vinyl_cover)
        .bind(&payload.vinyl_version)
        .bind(&payload.album)
        .bind(&payload.artist)
        .bind(payload.songs)
        .bind(payload.upc)
        .fetch_one(&self.pool)
        .await?;

        Ok(vinyl_from_row(&row))
    }

    async fn update(&self, id: Uuid, payload: &VinylPayload) -> Result<Option<Vinyl>> {
        let row = sqlx::query(
            r#"
            UPDATE vinyls
            SET vinyl_cover = $1, vinyl_version = $2, album = $3, artist = $4,
                songs = $5, upc = $6
            WHERE id = $7
            RETURNING id, vinyl_cover, vinyl_version, album, artist, songs, upc
            "#,
        )
        .bind(&payload.vinyl_cover)
        .bind(&payload.vinyl_version)
        .bind(&payload.album)
        .bind(&payload.artist)
        .bind(payload.songs)
        .bind(payload.upc)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(vinyl_from_row))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vinyls WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
