//! Per-device mutual exclusion for multi-step use-cases.
//!
//! Loan registration, loan return, status overrides and deletion all read a
//! device, decide, then write. Each of them holds the device's lock for the
//! whole sequence so two requests on the same device are serialized while
//! requests on different devices never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use lendbox_domain::id::DeviceId;

/// Registry of one async mutex per device id.
///
/// Entries are created on demand and pruned once nobody holds or waits on
/// them, so the registry only grows with the number of devices currently in
/// flight.
#[derive(Debug, Default)]
pub struct DeviceLocks {
    locks: Mutex<HashMap<DeviceId, Arc<AsyncMutex<()>>>>,
}

impl DeviceLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    ///
    /// The returned guard releases the device when dropped.
    pub async fn lock(&self, id: DeviceId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of devices with a live lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
