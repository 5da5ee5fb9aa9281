//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use lendbox_app::ports::{DeviceRepository, LoanRepository};
use lendbox_domain::device::{Device, DeviceStatus};
use lendbox_domain::id::DeviceId;

use super::{json_body, parse_path_id, query_params};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a device.
///
/// Every field is optional at the wire level so that a missing name is
/// reported as a validation failure. Extra fields such as `id`, `status` or
/// `addedDate` are ignored: the service assigns them.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub location: Option<String>,
}

/// Query string of the status override endpoint.
#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: DeviceStatus,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and status endpoints.
pub enum GetResponse {
    Ok(Json<Device>),
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
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<D, L>(State(state): State<AppState<D, L>>) -> Result<ListResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let devices = state.device_service.list_devices().await?;
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/devices/{id}`
pub async fn get<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_path_id("Device", &id)?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<D, L>(
    State(state): State<AppState<D, L>>,
    payload: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let req = json_body(payload)?;
    let device = Device::builder()
        .name(req.name.unwrap_or_default())
        .device_type(req.device_type.unwrap_or_default())
        .location(req.location.unwrap_or_default())
        .build()?;

    let created = state.device_service.register_device(device).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/devices/{id}/status?status=LOANED`
pub async fn update_status<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<GetResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_path_id("Device", &id)?;
    let query = query_params(query)?;
    let device = state
        .device_service
        .update_device_status(device_id, query.status)
        .await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `DELETE /api/devices/{id}`
pub async fn delete<D, L>(
    State(state): State<AppState<D, L>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    D: DeviceRepository + Send + Sync + 'static,
    L: LoanRepository + Send + Sync + 'static,
{
    let device_id: DeviceId = parse_path_id("Device", &id)?;
    state.device_service.delete_device(device_id).await?;
    Ok(DeleteResponse::NoContent)
}
