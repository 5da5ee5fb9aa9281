//! Loan — a device lent to a borrower for a period of time.
//!
//! A loan is opened with `returned == false` and closed exactly once by
//! [`Loan::mark_returned`]. Closing is one-way: a returned loan never reopens.

use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, LendBoxError, ValidationError};
use crate::id::{DeviceId, LoanId};
use crate::time::{Timestamp, now};

/// A record associating a device with a borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    pub device_id: DeviceId,
    pub borrowed_by: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub returned: bool,
    pub returned_date: Option<Timestamp>,
}

impl Loan {
    /// Create a builder for constructing a [`Loan`].
    #[must_use]
    pub fn builder() -> LoanBuilder {
        LoanBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::Validation`] when `borrowed_by` is empty or blank.
    pub fn validate(&self) -> Result<(), LendBoxError> {
        if self.borrowed_by.trim().is_empty() {
            return Err(ValidationError::EmptyBorrower.into());
        }
        Ok(())
    }

    /// Close the loan, recording when the device came back.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::LoanAlreadyReturned`] if the loan was already
    /// closed. The loan is left untouched in that case.
    pub fn mark_returned(&mut self, at: Timestamp) -> Result<(), LendBoxError> {
        if self.returned {
            return Err(ConflictError::LoanAlreadyReturned(self.id).into());
        }
        self.returned = true;
        self.returned_date = Some(at);
        Ok(())
    }
}

/// Step-by-step builder for [`Loan`].
#[derive(Debug, Default)]
pub struct LoanBuilder {
    id: Option<LoanId>,
    device_id: Option<DeviceId>,
    borrowed_by: Option<String>,
    start_date: Option<Timestamp>,
    end_date: Option<Timestamp>,
    returned: bool,
    returned_date: Option<Timestamp>,
}

impl LoanBuilder {
    #[must_use]
    pub fn id(mut self, id: LoanId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: DeviceId) -> Self {
        self.device_id = Some(device_id);
        self
    }

    #[must_use]
    pub fn borrowed_by(mut self, borrowed_by: impl Into<String>) -> Self {
        self.borrowed_by = Some(borrowed_by.into());
        self
    }

    #[must_use]
    pub fn start_date(mut self, start_date: Timestamp) -> Self {
        self.start_date = Some(start_date);
        self
    }

    #[must_use]
    pub fn end_date(mut self, end_date: Timestamp) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Mark the loan as already closed at `at`.
    #[must_use]
    pub fn returned_at(mut self, at: Timestamp) -> Self {
        self.returned = true;
        self.returned_date = Some(at);
        self
    }

    /// Consume the builder, validate, and return a [`Loan`].
    ///
    /// Missing dates default to the current time.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::Validation`] if `borrowed_by` is missing or
    /// empty, or [`ValidationError::InvalidId`] if no device was given.
    pub fn build(self) -> Result<Loan, LendBoxError> {
        let device_id = self
            .device_id
            .ok_or_else(|| ValidationError::InvalidId("deviceId is required".to_string()))?;
        let start_date = self.start_date.unwrap_or_else(now);
        let loan = Loan {
            id: self.id.unwrap_or_default(),
            device_id,
            borrowed_by: self.borrowed_by.unwrap_or_default(),
            start_date,
            end_date: self.end_date.unwrap_or(start_date),
            returned: self.returned,
            returned_date: self.returned_date,
        };
        loan.validate()?;
        Ok(loan)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn open_loan() -> Loan {
        let start = now();
        Loan::builder()
            .device_id(DeviceId::new())
            .borrowed_by("Juan Perez")
            .start_date(start)
            .end_date(start + Duration::days(7))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_open_loan_when_borrower_and_device_provided() {
        let loan = open_loan();
        assert_eq!(loan.borrowed_by, "Juan Perez");
        assert!(!loan.returned);
        assert!(loan.returned_date.is_none());
        assert!(loan.end_date > loan.start_date);
    }

    #[test]
    fn should_return_validation_error_when_borrower_is_empty() {
        let result = Loan::builder()
            .device_id(DeviceId::new())
            .borrowed_by("")
            .build();
        assert!(matches!(
            result,
            Err(LendBoxError::Validation(ValidationError::EmptyBorrower))
        ));
    }

    #[test]
    fn should_return_validation_error_when_device_missing() {
        let result = Loan::builder().borrowed_by("Alice").build();
        assert!(matches!(
            result,
            Err(LendBoxError::Validation(ValidationError::InvalidId(_)))
        ));
    }

    #[test]
    fn should_close_loan_when_marked_returned() {
        let mut loan = open_loan();
        let at = now();
        loan.mark_returned(at).unwrap();
        assert!(loan.returned);
        assert_eq!(loan.returned_date, Some(at));
    }

    #[test]
    fn should_reject_second_return_and_keep_first_timestamp() {
        let mut loan = open_loan();
        let first = now();
        loan.mark_returned(first).unwrap();

        let result = loan.mark_returned(now());
        assert!(matches!(
            result,
            Err(LendBoxError::Conflict(ConflictError::LoanAlreadyReturned(id))) if id == loan.id
        ));
        assert!(loan.returned);
        assert_eq!(loan.returned_date, Some(first));
    }

    #[test]
    fn should_serialize_with_camel_case_keys() {
        let loan = open_loan();
        let json = serde_json::to_value(&loan).unwrap();
        assert_eq!(json["borrowedBy"], "Juan Perez");
        assert_eq!(json["deviceId"], loan.device_id.to_string());
        assert_eq!(json["returned"], false);
    }
}
