//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod loans;

use std::str::FromStr;

use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::routing::{get, put};
use axum::{Json, Router};

use lendbox_app::ports::{DeviceRepository, LoanRepository};
use lendbox_domain::error::{LendBoxError, NotFoundError, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<D, L>() -> Router<AppState<D, L>>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    Router::new()
        // Devices
        .route(
            "/devices",
            get(devices::list::<D, L>).post(devices::create::<D, L>),
        )
        .route(
            "/devices/{id}",
            get(devices::get::<D, L>).delete(devices::delete::<D, L>),
        )
        .route(
            "/devices/{id}/status",
            put(devices::update_status::<D, L>),
        )
        // Loans
        .route("/loans", get(loans::list::<D, L>).post(loans::create::<D, L>))
        .route("/loans/{id}", get(loans::get::<D, L>))
        .route("/loans/{id}/return", put(loans::mark_returned::<D, L>))
        .route("/loans/device/{id}", get(loans::list_by_device::<D, L>))
}

/// Parse an identifier taken from the URL path.
///
/// A malformed id can never name a stored record, so it is answered as a
/// missing `entity` rather than as a bad request.
fn parse_path_id<T: FromStr>(entity: &'static str, raw: &str) -> Result<T, ApiError> {
    T::from_str(raw).map_err(|_| {
        ApiError::from(LendBoxError::from(NotFoundError {
            entity,
            id: raw.to_string(),
        }))
    })
}

/// Unwrap a JSON body, answering any decoding failure as a validation error.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| malformed(&rejection.body_text()))
}

/// Unwrap a query string the same way as [`json_body`].
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| malformed(&rejection.body_text()))
}

fn malformed(reason: &str) -> ApiError {
    ApiError::from(LendBoxError::from(ValidationError::Malformed(
        reason.to_string(),
    )))
}
