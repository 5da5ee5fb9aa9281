//! # lendbox-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API under `/api` (`/api/devices`, `/api/loans`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map [`LendBoxError`](lendbox_domain::error::LendBoxError) variants onto
//!   status codes with a `{"error": "..."}` body
//!
//! ## Dependency rule
//! Depends on `lendbox-app` (for port traits and services) and `lendbox-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
