//! Device — a trackable physical asset that can be lent out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConflictError, LendBoxError, ValidationError};
use crate::id::DeviceId;
use crate::time::{Timestamp, now};

/// Availability of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    #[default]
    Available,
    Loaned,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("AVAILABLE"),
            Self::Loaned => f.write_str("LOANED"),
        }
    }
}

/// Returned when a status string is neither `AVAILABLE` nor `LOANED`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device status {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for DeviceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "LOANED" => Ok(Self::Loaned),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A physical device tracked by the organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub location: String,
    pub status: DeviceStatus,
    pub added_date: Timestamp,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::Validation`] when `name` is empty or blank.
    pub fn validate(&self) -> Result<(), LendBoxError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == DeviceStatus::Available
    }

    /// Move the device to [`DeviceStatus::Loaned`].
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::DeviceNotAvailable`] unless the device is
    /// currently available. A device carries at most one open loan.
    pub fn lend(&mut self) -> Result<(), LendBoxError> {
        if !self.is_available() {
            return Err(ConflictError::DeviceNotAvailable(self.id).into());
        }
        self.status = DeviceStatus::Loaned;
        Ok(())
    }

    /// Move the device back to [`DeviceStatus::Available`].
    pub fn release(&mut self) {
        self.status = DeviceStatus::Available;
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    name: Option<String>,
    device_type: Option<String>,
    location: Option<String>,
    status: Option<DeviceStatus>,
    added_date: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: DeviceStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn added_date(mut self, added_date: Timestamp) -> Self {
        self.added_date = Some(added_date);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// Unset fields default to a fresh id, empty descriptive strings,
    /// [`DeviceStatus::Available`] and the current time.
    ///
    /// # Errors
    ///
    /// Returns [`LendBoxError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Device, LendBoxError> {
        let device = Device {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            device_type: self.device_type.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            added_date: self.added_date.unwrap_or_else(now),
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laptop() -> Device {
        Device::builder()
            .name("Laptop")
            .device_type("Electronics")
            .location("Office")
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_available_device_when_name_provided() {
        let device = laptop();
        assert_eq!(device.name, "Laptop");
        assert_eq!(device.device_type, "Electronics");
        assert_eq!(device.status, DeviceStatus::Available);
    }

    #[test]
    fn should_return_validation_error_when_name_is_missing() {
        let result = Device::builder().location("Office").build();
        assert!(matches!(
            result,
            Err(LendBoxError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_blank() {
        let result = Device::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(LendBoxError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_mark_loaned_when_lending_available_device() {
        let mut device = laptop();
        device.lend().unwrap();
        assert_eq!(device.status, DeviceStatus::Loaned);
    }

    #[test]
    fn should_reject_lending_when_already_loaned() {
        let mut device = laptop();
        device.lend().unwrap();

        let result = device.lend();
        assert!(matches!(
            result,
            Err(LendBoxError::Conflict(ConflictError::DeviceNotAvailable(id))) if id == device.id
        ));
        assert_eq!(device.status, DeviceStatus::Loaned);
    }

    #[test]
    fn should_become_available_again_when_released() {
        let mut device = laptop();
        device.lend().unwrap();
        device.release();
        assert!(device.is_available());
    }

    #[test]
    fn should_parse_status_from_upper_case_name() {
        assert_eq!(
            "LOANED".parse::<DeviceStatus>().unwrap(),
            DeviceStatus::Loaned
        );
        assert!("loaned".parse::<DeviceStatus>().is_err());
    }

    #[test]
    fn should_serialize_with_camel_case_keys_and_type_field() {
        let device = laptop();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "Electronics");
        assert_eq!(json["status"], "AVAILABLE");
        assert!(json.get("addedDate").is_some());
    }
}
