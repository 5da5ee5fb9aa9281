//! `SQLite` implementation of [`DeviceRepository`].

use std::future::Future;
use std::str::FromStr;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use lendbox_app::ports::DeviceRepository;
use lendbox_domain::device::{Device, DeviceStatus};
use lendbox_domain::error::LendBoxError;
use lendbox_domain::id::DeviceId;

use crate::error::{StorageError, decode};

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Device> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let device_type: String = row.try_get("device_type")?;
        let location: String = row.try_get("location")?;
        let status: String = row.try_get("status")?;
        let added_date: String = row.try_get("added_date")?;

        let id = DeviceId::from_str(&id).map_err(decode)?;
        let status = DeviceStatus::from_str(&status).map_err(decode)?;
        let added_date = DateTime::parse_from_rfc3339(&added_date)
            .map_err(decode)?
            .to_utc();

        Ok(Self(Device {
            id,
            name,
            device_type,
            location,
            status,
            added_date,
        }))
    }
}

const UPSERT: &str = r"
    INSERT INTO devices (id, name, device_type, location, status, added_date)
    VALUES (?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        device_type = excluded.device_type,
        location = excluded.location,
        status = excluded.status,
        added_date = excluded.added_date
";
const SELECT_BY_ID: &str = "SELECT * FROM devices WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM devices";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";
const DELETE_ALL: &str = "DELETE FROM devices";

/// `SQLite`-backed device repository.
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(device.id.to_string())
                .bind(&device.name)
                .bind(&device.device_type)
                .bind(&device.location)
                .bind(device.status.to_string())
                .bind(device.added_date.to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(device)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, LendBoxError>> + Send {
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

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;

    async fn setup() -> SqliteDeviceRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteDeviceRepository::new(db.pool().clone())
    }

    fn test_device() -> Device {
        Device::builder()
            .name("Laptop")
            .device_type("Electronics")
            .location("Office")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_save_and_retrieve_device_when_valid() {
        let repo = setup().await;
        let device = test_device();
        let id = device.id;

        repo.save(device.clone()).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.name, "Laptop");
        assert_eq!(fetched.device_type, "Electronics");
        assert_eq!(fetched.location, "Office");
        assert_eq!(fetched.status, DeviceStatus::Available);
        assert_eq!(fetched.added_date, device.added_date);
    }

    #[tokio::test]
    async fn should_return_none_when_device_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(DeviceId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_all_devices() {
        let repo = setup().await;
        repo.save(test_device()).await.unwrap();
        repo.save(Device::builder().name("TVs").build().unwrap())
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_overwrite_existing_row_when_saved_again() {
        let repo = setup().await;
        let mut device = test_device();
        let id = device.id;
        repo.save(device.clone()).await.unwrap();

        device.status = DeviceStatus::Loaned;
        device.location = "Room101".to_string();
        repo.save(device).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, DeviceStatus::Loaned);
        assert_eq!(fetched.location, "Room101");
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_delete_device_when_exists() {
        let repo = setup().await;
        let device = test_device();
        let id = device.id;
        repo.save(device).await.unwrap();

        repo.delete(id).await.unwrap();

        let result = repo.get_by_id(id).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_remove_every_device_when_deleting_all() {
        let repo = setup().await;
        repo.save(test_device()).await.unwrap();
        repo.save(test_device()).await.unwrap();

        repo.delete_all().await.unwrap();

        assert!(repo.get_all().await.unwrap().is_empty());
    }
}
