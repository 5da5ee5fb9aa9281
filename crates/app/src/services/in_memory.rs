//! In-memory port fakes shared by the service tests.
//!
//! Every call yields to the scheduler before touching the map so that
//! concurrently polled use-cases interleave between their reads and writes.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lendbox_domain::device::Device;
use lendbox_domain::error::LendBoxError;
use lendbox_domain::id::{DeviceId, LoanId};
use lendbox_domain::loan::Loan;

use crate::ports::{DeviceRepository, LoanRepository};

#[derive(Default)]
pub struct InMemoryDeviceRepo {
    store: Arc<Mutex<HashMap<DeviceId, Device>>>,
}

impl InMemoryDeviceRepo {
    pub fn count(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}

impl DeviceRepository for InMemoryDeviceRepo {
    fn save(&self, device: Device) -> impl Future<Output = Result<Device, LendBoxError>> + Send {
        let store = Arc::clone(&self.store);
        async move {
            tokio::task::yield_now().await;
            store.lock().unwrap().insert(device.id, device.clone());
            Ok(device)
        }
    }

    fn get_by_id(
        &self,
        id: DeviceId,
    ) -> impl Future<Output = Result<Option<Device>, LendBoxError>> + Send {
        let store = Arc::clone(&self.store);
        async move {
            tokio::task::yield_now().await;
            let result = store.lock().unwrap().get(&id).cloned();
            Ok(result)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, LendBoxError>> + Send {
        let result: Vec<Device> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn delete(&self, id: DeviceId) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        self.store.lock().unwrap().remove(&id);
        async { Ok(()) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        self.store.lock().unwrap().clear();
        async { Ok(()) }
    }
}

#[derive(Default)]
pub struct InMemoryLoanRepo {
    store: Arc<Mutex<HashMap<LoanId, Loan>>>,
    reject_writes: Arc<AtomicBool>,
}

impl InMemoryLoanRepo {
    pub fn count(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    /// Make every later `save` fail with a storage error.
    pub fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }
}

impl LoanRepository for InMemoryLoanRepo {
    fn save(&self, loan: Loan) -> impl Future<Output = Result<Loan, LendBoxError>> + Send {
        let store = Arc::clone(&self.store);
        let reject = self.reject_writes.load(Ordering::SeqCst);
        async move {
            tokio::task::yield_now().await;
            if reject {
                return Err(LendBoxError::Storage(Box::new(DiskFull)));
            }
            store.lock().unwrap().insert(loan.id, loan.clone());
            Ok(loan)
        }
    }

    fn get_by_id(
        &self,
        id: LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, LendBoxError>> + Send {
        let store = Arc::clone(&self.store);
        async move {
            tokio::task::yield_now().await;
            let result = store.lock().unwrap().get(&id).cloned();
            Ok(result)
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        let result: Vec<Loan> = self.store.lock().unwrap().values().cloned().collect();
        async { Ok(result) }
    }

    fn find_by_device_id(
        &self,
        device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        let result: Vec<Loan> = self
            .store
            .lock()
            .unwrap()
            .values()
            .filter(|loan| loan.device_id == device_id)
            .cloned()
            .collect();
        async { Ok(result) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        self.store.lock().unwrap().clear();
        async { Ok(()) }
    }
}

/// A loan repository whose writes always fail, for exercising rollback paths.
#[derive(Default)]
pub struct FailingLoanRepo;

#[derive(Debug, thiserror::Error)]
#[error("disk full")]
pub struct DiskFull;

impl LoanRepository for FailingLoanRepo {
    fn save(&self, _loan: Loan) -> impl Future<Output = Result<Loan, LendBoxError>> + Send {
        async { Err(LendBoxError::Storage(Box::new(DiskFull))) }
    }

    fn get_by_id(
        &self,
        _id: LoanId,
    ) -> impl Future<Output = Result<Option<Loan>, LendBoxError>> + Send {
        async { Ok(None) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        async { Ok(vec![]) }
    }

    fn find_by_device_id(
        &self,
        _device_id: DeviceId,
    ) -> impl Future<Output = Result<Vec<Loan>, LendBoxError>> + Send {
        async { Ok(vec![]) }
    }

    fn delete_all(&self) -> impl Future<Output = Result<(), LendBoxError>> + Send {
        async { Ok(()) }
    }
}
