//! # lendbox-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `lendbox-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `lendbox-app` (for port traits) and `lendbox-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;
mod error;
mod loan_repo;
mod pool;

pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use loan_repo::SqliteLoanRepository;
pub use pool::{Config, Database};
