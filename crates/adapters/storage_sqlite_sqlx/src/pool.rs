//! Database bootstrap: open the `SQLite` pool and bring the schema up to date.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::error::StorageError;

/// Where the lendbox database lives.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:lendbox.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Open the database, creating the file if missing, and apply every
    /// pending migration from `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails
    /// or a migration cannot be applied.
    pub async fn build(self) -> Result<Database, StorageError> {
        let options =
            SqliteConnectOptions::from_str(&self.database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(url = %self.database_url, "lendbox schema is up to date");

        Ok(Database { pool })
    }
}

/// An open, migrated lendbox database.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connection pool shared by the repositories.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
