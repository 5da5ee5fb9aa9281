//! # lendbox-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `DeviceRepository` — CRUD for devices
//!   - `LoanRepository` — CRUD for loans plus lookup by device
//! - Define **driving/inbound ports** as use-case structs:
//!   - `DeviceService` — register, list, get, override status, guarded delete
//!   - `LoanService` — register, list, get, return, list by device
//! - Serialize multi-step use-cases per device (`DeviceLocks`)
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `lendbox-domain` only (plus `tokio::sync` for locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod device_locks;
pub mod ports;
pub mod services;
