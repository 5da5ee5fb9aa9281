//! JSON REST handlers for loans.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use lendbox_app::ports::{DeviceRepository, LoanRepository};
use lendbox_domain::error::{LendBoxError, NotFoundError, ValidationError};
use lendbox_domain::id::{DeviceId, LoanId};
use lendbox_domain::loan::Loan;
use lendbox_domain::time::Timestamp;

use super::{json_body, parse_path_id};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a loan.
///
/// `returned`, `returnedDate` and `id` are ignored if present. A missing
/// `startDate` defaults to now and a missing `endDate` to the start date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub device_id: Option<String>,
    pub borrowed_by: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

impl CreateLoanRequest {
    fn into_loan(self) -> Result<Loan, LendBoxError> {
        let raw = self
            .device_id
            .ok_or_else(|| ValidationError::InvalidId("deviceId is required".to_string()))?;
        let device_id: DeviceId = raw
            .parse()
            .map_err(|_| ValidationError::InvalidId(raw.clone()))?;

        let mut builder = Loan::builder()
            .device_id(device_id)
            .borrowed_by(self.borrowed_by.unwrap_or_default());
        if let Some(start) = self.start_date {
            builder = builder.start_date(start);
        }
        if let Some(end) = self.end_date {
            builder = builder.end_date(end);
        }
        builder.build()
    }
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<Loan>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and return endpoints.
pub enum GetResponse {
    Ok(Json<Loan>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Loan>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/loans`
pub async fn list<D, L>(State(state): State<AppState<D, L>>) -> Result<ListResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let loans = state.loan_service.list_loans().await?;
    Ok(ListResponse::Ok(Json(loans)))
}

/// `GET /api/loans/{id}`
pub async fn get<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let loan_id: LoanId = parse_path_id("Loan", &id)?;
    let loan = state
        .loan_service
        .get_loan(loan_id)
        .await?
        .ok_or_else(|| {
            LendBoxError::from(NotFoundError {
                entity: "Loan",
                id: loan_id.to_string(),
            })
        })?;
    Ok(GetResponse::Ok(Json(loan)))
}

/// `POST /api/loans`
pub async fn create<D, L>(
    State(state): State<AppState<D, L>>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let loan = json_body(payload)?.into_loan()?;
    let created = state.loan_service.register_loan(loan).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/loans/{id}/return`
pub async fn mark_returned<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let loan_id: LoanId = parse_path_id("Loan", &id)?;
    let loan = state.loan_service.mark_as_returned(loan_id).await?;
    Ok(GetResponse::Ok(Json(loan)))
}

/// `GET /api/loans/device/{id}`
pub async fn list_by_device<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_path_id("Device", &id)?;
    let loans = state.loan_service.list_loans_by_device(device_id).await?;
    Ok(ListResponse::Ok(Json(loans)))
}
