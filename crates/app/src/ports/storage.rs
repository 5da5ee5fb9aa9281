//! Storage port — repository traits for persistence.
//!
//! Repositories own durability only. Business rules (availability checks, the
//! deletion guard, the one-way `returned` flag) live in the services.

use std::future::Future;
use std::sync::Arc;

use lendbox_domain::device::Device;
use lendbox_domain::error::LendBoxError;
use lendbox_domain::id::{DeviceId, LoanId};
use lendbox_domain::loan::Loan;

/// Repository for persisting and querying [`Device`]s.
pub trait DeviceRepository {
    /// Insert the device, or overwrite the stored record with the same id.
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, LendBoxError>> + Send;

    /// Get a device by its unique identifier.
    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, LendBoxError>> + Send;

    /// Get all devices, in no particular order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, LendBoxError>> + Send;

    /// Delete a device by its unique identifier. Deleting a missing id is not an error.
    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), LendBoxError>> + Send;

    /// Remove every device.
    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send;
}

/// Repository for persisting and querying [`Loan`]s.
pub trait LoanRepository {
    /// Insert the loan, or overwrite the stored record with the same id.
    fn save(&self, loan: Loan) -> impl Future<Output = Result<Loan, LendBoxError>> + Send;

    /// Get a loan by its unique identifier.
    fn get_by_id(
        &self,
        id: LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, LendBoxError>> + Send;

    /// Get all loans, in no particular order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send;

    /// Find every loan referencing `device_id`, returned or not.
    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send;

    /// Remove every loan.
    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send;
}

impl<T: DeviceRepository + Send + Sync> DeviceRepository for Arc<T> {
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, LendBoxError>> + Send {
        (**self).save(device)
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, LendBoxError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, LendBoxError>> + Send {
        (**self).get_all()
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        (**self).delete(id)
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        (**self).delete_all()
    }
}

impl<T: LoanRepository + Send + Sync> LoanRepository for Arc<T> {
    fn save(&self, loan: Loan) -> impl Future<Output = Result<Loan, LendBoxError>> + Send {
        (**self).save(loan)
    }

    fn get_by_id(
        &self,
        id: LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, LendBoxError>> + Send {
        (**self).get_by_id(id)
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        (**self).get_all()
    }

    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        (**self).find_by_device_id(device_id)
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        (**self).delete_all()
    }
}
