//! Shared application state for axum handlers.

use std::sync::Arc;

use lendbox_app::ports::{DeviceRepository, LoanRepository};
use lendbox_app::services::device_service::DeviceService;
use lendbox_app::services::loan_service::LoanService;

/// Application state shared across all axum handlers.
///
/// Generic over the device and loan repository types to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are cloned.
pub struct AppState<D, L> {
    /// Device registration, status and deletion.
    pub device_service: Arc<DeviceService<D, L>>,
    /// Loan lifecycle.
    pub loan_service: Arc<LoanService<D, L>>,
}

impl<D, L> Clone for AppState<D, L> {
    fn clone(&self) -> Self {
        Self {
            device_service: Arc::clone(&self.device_service),
            loan_service: Arc::clone(&self.loan_service),
        }
    }
}

impl<D, L> AppState<D, L>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(device_service: DeviceService<D, L>, loan_service: LoanService<D, L>) -> Self {
        Self {
            device_service: Arc::new(device_service),
            loan_service: Arc::new(loan_service),
        }
    }
}
