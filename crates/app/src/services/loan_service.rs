//! Loan service — use-cases for lending devices and taking them back.
//!
//! The device's `status` is kept in step with its loans here: registering a
//! loan moves the device to `LOANED`, returning it moves the device back to
//! `AVAILABLE`. Both sequences run under the device's lock.

use std::sync::Arc;

use lendbox_domain::error::{LendBoxError, NotFoundError, ValidationError};
use lendbox_domain::id::{DeviceId, LoanId};
use lendbox_domain::loan::Loan;
use lendbox_domain::time::now;

use crate::device_locks::DeviceLocks;
use crate::ports::{DeviceRepository, LoanRepository};

/// Application service for the loan lifecycle.
pub struct LoanService<D, L> {
    devices: D,
    loans: L,
    locks: Arc<DeviceLocks>,
}

impl<D: DeviceRepository, L: LoanRepository> LoanService<D, L> {
    /// Create a new service backed by the given repositories.
    pub fn new(devices: D, loans: L, locks: Arc<DeviceLocks>) -> Self {
        Self {
            devices,
            loans,
            locks,
        }
    }

    /// Lend a device.
    ///
    /// The loan is stored open (`returned == false`) regardless of what the
    /// caller set, and the device is saved as loaned.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::EmptyBorrower`] if nobody is named as borrower
    /// - [`ValidationError::UnknownDevice`] if the device does not exist
    /// - [`ConflictError::DeviceNotAvailable`](lendbox_domain::error::ConflictError::DeviceNotAvailable)
    ///   if the device is already out
    /// - a storage error from either repository
    #[tracing::instrument(skip(self, loan), fields(device_id = %loan.device_id, loan_id = %loan.id))]
    pub async fn register_loan(&self, mut loan: Loan) -> Result<Loan, LendBoxError> {
        loan.validate()?;
        loan.returned = false;
        loan.returned_date = None;

        let _guard = self.locks.lock(loan.device_id).await;
        let mut device = self
            .devices
            .get_by_id(loan.device_id)
            .await?
            .ok_or(ValidationError::UnknownDevice(loan.device_id))?;

        if let Err(err) = device.lend() {
            tracing::debug!(status = %device.status, "device is not available");
            return Err(err);
        }
        let device = self.devices.save(device).await?;

        match self.loans.save(loan).await {
            Ok(loan) => Ok(loan),
            Err(err) => {
                let mut device = device;
                device.release();
                if let Err(rollback) = self.devices.save(device).await {
                    tracing::error!(
                        error = %rollback,
                        "failed to restore device status after loan write failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// List all loans.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_loans(&self) -> Result<Vec<Loan>, LendBoxError> {
        self.loans.get_all().await
    }

    /// Look up a loan by id. Absence is not an error here.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_loan(&self, id: LoanId) -> Result<Option<Loan>, LendBoxError> {
        self.loans.get_by_id(id).await
    }

    /// Close a loan and make its device available again.
    ///
    /// Not idempotent: a second call on the same loan is rejected.
    ///
    /// # Errors
    ///
    /// - [`LendBoxError::NotFound`] if the loan does not exist, or if its
    ///   device has disappeared
    /// - [`ConflictError::LoanAlreadyReturned`](lendbox_domain::error::ConflictError::LoanAlreadyReturned)
    ///   if the loan is already closed
    /// - a storage error from either repository
    #[tracing::instrument(skip(self))]
    pub async fn mark_as_returned(&self, id: LoanId) -> Result<Loan, LendBoxError> {
        let device_id = self.require_loan(id).await?.device_id;

        let _guard = self.locks.lock(device_id).await;
        // Re-read under the lock: a concurrent return may have closed it.
        let mut loan = self.require_loan(id).await?;
        loan.mark_returned(now())?;

        let mut device = self.devices.get_by_id(device_id).await?.ok_or_else(|| {
            tracing::warn!(%device_id, "loan references a device that no longer exists");
            LendBoxError::from(NotFoundError {
                entity: "Device",
                id: device_id.to_string(),
            })
        })?;

        let previous = device.status;
        device.release();
        let device = self.devices.save(device).await?;

        match self.loans.save(loan).await {
            Ok(loan) => Ok(loan),
            Err(err) => {
                let mut device = device;
                device.status = previous;
                if let Err(rollback) = self.devices.save(device).await {
                    tracing::error!(
                        error = %rollback,
                        "failed to restore device status after return write failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// List every loan of a device, returned or not.
    ///
    /// An unknown device simply has no loans.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_loans_by_device(
        &self,
        device_id: DeviceId,
    ) -> Result<Vec<Loan>, LendBoxError> {
        self.loans.find_by_device_id(device_id).await
    }

    async fn require_loan(&self, id: LoanId) -> Result<Loan, LendBoxError> {
        self.loans.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Loan",
                id: id.to_string(),
            }
            .into()
        })
    }
}
