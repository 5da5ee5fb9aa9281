//! Device service — use-cases for managing devices.

use std::sync::Arc;

use lendbox_domain::device::{Device, DeviceStatus};
use lendbox_domain::error::{ConflictError, LendBoxError, NotFoundError};
use lendbox_domain::id::DeviceId;
use lendbox_domain::time::now;

use crate::device_locks::DeviceLocks;
use crate::ports::{DeviceRepository, LoanRepository};

/// Application service for device registration, status and deletion.
///
/// Reads the loan repository only to guard deletion; it never writes loans.
pub struct DeviceService<D, L> {
    devices: D,
    loans: L,
    locks: Arc<DeviceLocks>,
}

impl<D: DeviceRepository, L: LoanRepository> DeviceService<D, L> {
    /// Create a new service backed by the given repositories.
    ///
    /// `locks` must be the same registry handed to the
    /// [`LoanService`](crate::services::loan_service::LoanService) so that
    /// deletion and loan registration on one device are serialized.
    pub fn new(devices: D, loans: L, locks: Arc<DeviceLocks>) -> Self {
        Self {
            devices,
            loans,
            locks,
        }
    }

    /// Register a new device.
    ///
    /// Whatever status and date the caller set are replaced: new devices start
    /// [`DeviceStatus::Available`] and are stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::Validation`] if the name is empty, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, device), fields(device_name = %device.name))]
    pub async fn register_device(&self, mut device: Device) -> Result<Device, LendBoxError> {
        device.validate()?;
        device.status = DeviceStatus::Available;
        device.added_date = now();
        self.devices.save(device).await
    }

    /// List all devices.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_devices(&self) -> Result<Vec<Device>, LendBoxError> {
        self.devices.get_all().await
    }

    /// Look up a device by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: DeviceId) -> Result<Device, LendBoxError> {
        self.devices
            .get_by_id(id)
            .await?
            .ok_or_else(|| device_not_found(id))
    }

    /// Overwrite a device's status.
    ///
    /// This is an administrative override: no transition rule is checked and
    /// open loans are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::NotFound`] when no device with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn update_device_status(
        &self,
        id: DeviceId,
        status: DeviceStatus,
    ) -> Result<Device, LendBoxError> {
        let _guard = self.locks.lock(id).await;
        let mut device = self.get_device(id).await?;
        if device.status != status {
            tracing::info!(from = %device.status, to = %status, "overriding device status");
        }
        device.status = status;
        self.devices.save(device).await
    }

    /// Delete a device that has never been lent out.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::NotFound`] when no device with `id` exists,
    /// [`ConflictError::DeviceHasLoanHistory`] when any loan (returned or
    /// not) references it, or a storage error from a repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), LendBoxError> {
        let _guard = self.locks.lock(id).await;
        self.get_device(id).await?;

        let history = self.loans.find_by_device_id(id).await?;
        if !history.is_empty() {
            tracing::debug!(loans = history.len(), "refusing to delete device with loan history");
            return Err(ConflictError::DeviceHasLoanHistory(id).into());
        }

        self.devices.delete(id).await
    }
}

fn device_not_found(id: DeviceId) -> LendBoxError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}
