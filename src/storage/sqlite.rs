//! SQLite Store
//!
//! File-backed storage over a sqlx connection pool. The schema keeps one
//! row per `(from, to)` vouch pair, one proof row per user, and an
//! append-only penalty log. Timestamps are persisted as unix seconds.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tracing::info;

use crate::engine::{PenaltyEvent, ProofEvent, VouchEvent};
use crate::storage::{Storage, StorageError};

pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Opens the database at `path`, creating file and schema as needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Opens a private in-memory database, for tests. The pool is pinned to
    /// a single connection so every query sees the same database.
    pub async fn open_in_memory() -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vouches (
                from_user TEXT NOT NULL,
                to_user TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                PRIMARY KEY (from_user, to_user)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_vouches_from_user ON vouches(from_user)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_vouches_to_user ON vouches(to_user)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS proofs (
                user TEXT PRIMARY KEY,
                balance INTEGER NOT NULL,
                timestamp INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS penalties (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                amount INTEGER NOT NULL,
                timestamp INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_penalties_user ON penalties(user)")
            .execute(&self.pool)
            .await?;

        info!("SQLite schema initialized");
        Ok(())
    }
}

fn timestamp_from_unix(secs: i64) -> Result<DateTime<Utc>, StorageError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StorageError::Corrupt(format!("timestamp out of range: {secs}")))
}

fn vouch_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VouchEvent, StorageError> {
    // The persisted schema keeps only the pair and timestamp; the opaque
    // signature material is not stored.
    Ok(VouchEvent {
        from: row.try_get("from_user")?,
        to: row.try_get("to_user")?,
        signature: String::new(),
        nonce: String::new(),
        timestamp: timestamp_from_unix(row.try_get("timestamp")?)?,
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn add_vouch(&self, vouch: VouchEvent) -> Result<(), StorageError> {
        sqlx::query("REPLACE INTO vouches (from_user, to_user, timestamp) VALUES (?, ?, ?)")
            .bind(&vouch.from)
            .bind(&vouch.to)
            .bind(vouch.timestamp.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn vouches_from(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError> {
        let rows =
            sqlx::query("SELECT from_user, to_user, timestamp FROM vouches WHERE from_user = ?")
                .bind(user)
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(vouch_from_row).collect()
    }

    async fn vouches_to(&self, user: &str) -> Result<Vec<VouchEvent>, StorageError> {
        let rows =
            sqlx::query("SELECT from_user, to_user, timestamp FROM vouches WHERE to_user = ?")
                .bind(user)
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(vouch_from_row).collect()
    }

    async fn set_proof(&self, proof: ProofEvent) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO proofs (user, balance, timestamp) VALUES (?, ?, ?)
            ON CONFLICT(user) DO UPDATE SET
                balance = excluded.balance,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(&proof.user)
        .bind(proof.balance as i64)
        .bind(proof.timestamp.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn proof_of(&self, user: &str) -> Result<Option<ProofEvent>, StorageError> {
        let row = sqlx::query("SELECT user, balance, timestamp FROM proofs WHERE user = ?")
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let balance: i64 = row.try_get("balance")?;
                Ok(Some(ProofEvent {
                    user: row.try_get("user")?,
                    balance: balance as u64,
                    timestamp: timestamp_from_unix(row.try_get("timestamp")?)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn add_penalty(&self, penalty: PenaltyEvent) -> Result<(), StorageError> {
        sqlx::query("INSERT INTO penalties (user, amount, timestamp) VALUES (?, ?, ?)")
            .bind(&penalty.user)
            .bind(penalty.amount as i64)
            .bind(penalty.timestamp.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn penalties_of(&self, user: &str) -> Result<Vec<PenaltyEvent>, StorageError> {
        let rows =
            sqlx::query("SELECT user, amount, timestamp FROM penalties WHERE user = ? ORDER BY id")
                .bind(user)
                .fetch_all(&self.pool)
                .await?;

        rows.iter()
            .map(|row| -> Result<PenaltyEvent, StorageError> {
                let amount: i64 = row.try_get("amount")?;
                Ok(PenaltyEvent {
                    user: row.try_get("user")?,
                    amount: amount as u64,
                    timestamp: timestamp_from_unix(row.try_get("timestamp")?)?,
                })
            })
            .collect()
    }
}
