//! `SQLite` implementation of [`LoanRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use lendbox_app::ports::LoanRepository;
use lendbox_domain::error::LendBoxError;
use lendbox_domain::id::{DeviceId, LoanId};
use lendbox_domain::loan::Loan;
use lendbox_domain::time::Timestamp;

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Loan);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Loan> {
        value.map(|w| w.0)
    }
}

fn parse_timestamp(value: &str) -> Result<Timestamp, sqlx::Error> {
    Ok(DateTime::parse_from_rfc3339(value).map_err(decode)?.to_utc())
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let borrowed_by: String = row.try_get("borrowed_by")?;
        let start_date: String = row.try_get("start_date")?;
        let end_date: String = row.try_get("end_date")?;
        let returned: bool = row.try_get("returned")?;
        let returned_date: Option<String> = row.try_get("returned_date")?;

        Ok(Self(Loan {
            id: LoanId::from_str(&id).map_err(decode)?,
            device_id: DeviceId::from_str(&device_id).map_err(decode)?,
            borrowed_by,
            start_date: parse_timestamp(&start_date)?,
            end_date: parse_timestamp(&end_date)?,
            returned,
            returned_date: returned_date.as_deref().map(parse_timestamp).transpose()?,
        }))
    }
}

const UPSERT: &str = r"
    INSERT INTO loans (id, device_id, borrowed_by, start_date, end_date, returned, returned_date)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        device_id = excluded.device_id,
        borrowed_by = excluded.borrowed_by,
        start_date = excluded.start_date,
        end_date = excluded.end_date,
        returned = excluded.returned,
        returned_date = excluded.returned_date
";

const SELECT_BY_ID: &str = "SELECT * FROM loans WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM loans ORDER BY start_date";
const SELECT_BY_DEVICE: &str = "SELECT * FROM loans WHERE device_id = ? ORDER BY start_date";
const DELETE_ALL: &str = "DELETE FROM loans";

/// `SQLite`-backed loan repository.
pub struct SqliteLoanRepository {
    pool: SqlitePool,
}

impl SqliteLoanRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl LoanRepository for SqliteLoanRepository {
    fn save(&self, loan: Loan) -> impl Future<Output = Result<Loan, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(loan.id.to_string())
                .bind(loan.device_id.to_string())
                .bind(&loan.borrowed_by)
                .bind(loan.start_date.to_rfc3339())
                .bind(loan.end_date.to_rfc3339())
                .bind(loan.returned)
                .bind(loan.returned_date.map(|ts| ts.to_rfc3339()))
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(loan)
        }
    }

    fn get_by_id(
        &self,
        id: LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.to_string())
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_DEVICE)
                .bind(device_id.to_string())
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_ALL)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
