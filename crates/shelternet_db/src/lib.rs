//! Database layer for Shelternet.
//!
//! Every read and write of shelters, animals and adoption applications goes
//! through [`ShelterDb`]. Status changes are validated by the state machine in
//! [`fsm`] and [`batch`]; capacity bookkeeping lives in [`ledger`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use shelternet_db::{NewShelter, ShelterDb};
//!
//! let db = ShelterDb::open("sqlite:shelternet.sqlite").await?;
//! let shelter = db.shelter_create(&NewShelter::new("Dallas Animal Shelter", 20)).await?;
//! let offsite = db.animals_request(&[1, 2]).await?;
//! ```

mod error;
mod schema;
mod types;

pub mod batch;
pub mod fsm;
pub mod ledger;

// Method implementations organized by domain
mod animals;
mod applications;
mod shelters;

pub use batch::{
    plan_batch, AnimalState, BatchItem, BatchOperation, BatchPlan, BatchRejection, Transition,
    Violation, RETURN_REQUEST_NOTE,
};
pub use error::{DbError, Result};
pub use ledger::CapacityLedger;
pub use types::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// How long a writer waits for SQLite's write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Parsed database URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// Private in-memory database (lives as long as the handle).
    Memory,
    /// SQLite file, created if missing.
    File(PathBuf),
}

impl DatabaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw == "sqlite::memory:" || raw == ":memory:" {
            return Ok(Self::Memory);
        }
        if let Some(rest) = raw.strip_prefix("sqlite:") {
            let path = rest.trim_start_matches("//");
            let path = path.split('?').next().unwrap_or_default();
            if path.is_empty() {
                return Err(DbError::constraint(format!(
                    "sqlite URL missing path: {}",
                    raw
                )));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        Err(DbError::constraint(format!(
            "Unsupported database URL: {}",
            raw
        )))
    }
}

/// Handle to the Shelternet database.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ShelterDb {
    pool: SqlitePool,
}

impl ShelterDb {
    /// Open the database at `url`, creating tables if they don't exist.
    pub async fn open(url: &str) -> Result<Self> {
        let db = match DatabaseUrl::parse(url)? {
            DatabaseUrl::Memory => Self::connect_memory().await?,
            DatabaseUrl::File(path) => {
                // Ensure parent directory exists
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }

                let options = SqliteConnectOptions::new()
                    .filename(&path)
                    .create_if_missing(true)
                    .foreign_keys(true)
                    .busy_timeout(BUSY_TIMEOUT);

                let pool = SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(options)
                    .await?;

                info!(path = %path.display(), "Database opened");
                Self { pool }
            }
        };

        db.ensure_schema().await?;
        Ok(db)
    }

    /// Open a fresh in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Self::connect_memory().await?;
        db.ensure_schema().await?;
        Ok(db)
    }

    async fn connect_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // An in-memory database exists per connection, so pin the pool to a
        // single connection that is never recycled.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        info!("In-memory database opened");
        Ok(Self { pool })
    }

    /// Begin a transaction that holds the write lock from its first statement.
    ///
    /// In WAL mode a deferred transaction that has already read cannot wait
    /// for the lock; it fails with `SQLITE_BUSY`. Every read-then-write
    /// operation goes through here so concurrent writers queue on the busy
    /// timeout instead.
    pub(crate) async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Get the underlying connection pool (escape hatch for complex queries).
    ///
    /// Prefer using the typed methods instead.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
