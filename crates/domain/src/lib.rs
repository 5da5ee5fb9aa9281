//! # lendbox-domain
//!
//! Pure domain model for the lendbox device-loan tracker.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (physical assets with a location and an availability status)
//! - Define **Loans** (a device lent to a borrower for a period, with a returned flag)
//! - Enforce the per-record invariants: non-empty names and borrowers, the
//!   `AVAILABLE -> LOANED -> AVAILABLE` device cycle and the one-way
//!   `returned` flag on loans
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod loan;
