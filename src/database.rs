//! Database module for the vault-charm library
//!
//! This module implements the SQLite-based secret store the charm uses both to
//! read administrator-granted secrets (the bootstrap token) and to persist its
//! own secrets (the AppRole credential) across unit restarts.
//!
//! Architectural role:
//! - Implements the `SecretStore` trait consumed by the authorize handshake
//! - Manages connection pooling and schema creation

use crate::interface::{Secret, SecretStore};
use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Errors raised by the secret store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Secret content could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Database connection pool type
pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// SQLite-backed secret store
#[derive(Clone)]
pub struct SecretDatabase {
    pool: Arc<DbPool>,
}

impl SecretDatabase {
    /// Open (or create) the secret store at `db_path`
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::new(manager)?;
        Self::with_pool(pool)
    }

    /// A private in-memory store. A single pooled connection keeps one database alive.
    pub fn in_memory() -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: DbPool) -> Result<Self, StoreError> {
        let connection = pool.get()?;
        Self::init_database(&connection)?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize the database with required tables
    fn init_database(conn: &DbConnection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS secrets (
                id TEXT PRIMARY KEY,
                label TEXT UNIQUE,
                revision INTEGER NOT NULL,
                content TEXT NOT NULL
            )",
            [],
        )?;
        debug!("Secret store initialized");
        Ok(())
    }

    fn row_to_secret(row: &Row<'_>) -> rusqlite::Result<Secret> {
        let content_json: String = row.get(3)?;
        let content: BTreeMap<String, String> =
            serde_json::from_str(&content_json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?;
        Ok(Secret::new(
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, u32>(2)?,
            content,
        ))
    }

    /// Adds a new secret and returns it with its freshly minted id.
    pub fn add_secret(
        &self,
        content: BTreeMap<String, String>,
        label: Option<&str>,
    ) -> Result<Secret, StoreError> {
        let conn = self.pool.get()?;
        let id = format!("secret:{}", Uuid::new_v4().simple());
        let content_json = serde_json::to_string(&content)?;
        conn.execute(
            "INSERT INTO secrets (id, label, revision, content) VALUES (?1, ?2, 1, ?3)",
            params![id, label, content_json],
        )?;
        info!("Added secret {} with {} keys", id, content.len());
        Ok(Secret::new(id, label.map(str::to_string), 1, content))
    }

    /// Removes a secret; returns false if it did not exist.
    pub fn remove_secret(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM secrets WHERE id = ?1", params![id])?;
        if removed > 0 {
            info!("Removed secret {}", id);
        }
        Ok(removed > 0)
    }
}

impl SecretStore for SecretDatabase {
    fn get_secret(&self, id: &str) -> Result<Option<Secret>, StoreError> {
        let conn = self.pool.get()?;
        let secret = conn
            .query_row(
                "SELECT id, label, revision, content FROM secrets WHERE id = ?1",
                params![id],
                Self::row_to_secret,
            )
            .optional()?;
        Ok(secret)
    }

    fn get_secret_by_label(&self, label: &str) -> Result<Option<Secret>, StoreError> {
        let conn = self.pool.get()?;
        let secret = conn
            .query_row(
                "SELECT id, label, revision, content FROM secrets WHERE label = ?1",
                params![label],
                Self::row_to_secret,
            )
            .optional()?;
        Ok(secret)
    }

    fn put_secret(
        &self,
        label: &str,
        content: BTreeMap<String, String>,
    ) -> Result<Secret, StoreError> {
        match self.get_secret_by_label(label)? {
            Some(existing) => {
                let conn = self.pool.get()?;
                let revision = existing.revision + 1;
                conn.execute(
                    "UPDATE secrets SET content = ?1, revision = ?2 WHERE id = ?3",
                    params![serde_json::to_string(&content)?, revision, existing.id],
                )?;
                info!("Updated secret {} to revision {}", label, revision);
                Ok(Secret::new(existing.id, Some(label.to_string()), revision, content))
            }
            None => self.add_secret(content, Some(label)),
        }
    }
}
