//! Job-requirement handlers: add, reconcile, rate update, removal.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    Ack, AddRequirementRequest, ReplaceOutcomeResponse, ReplaceRequirementsRequest,
    RequirementResponse, UpdateRateRequest,
};
use crate::app_state::AppState;
use crate::domain::model::Job;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events/:id/requirements` — Open a role on an event.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for an invalid rate or job id,
/// [`GatewayError::EventNotFound`] for unknown events.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/requirements",
    tag = "Requirements",
    summary = "Add a job requirement",
    description = "Opens a role on an event with a daily rate. Rates must be zero or positive.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = AddRequirementRequest,
    responses(
        (status = 201, description = "Requirement created", body = RequirementResponse),
        (status = 400, description = "Invalid rate or job", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn add_requirement(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AddRequirementRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let job = Job {
        id: req.job_id,
        name: req.job_name,
    };
    let requirement = state
        .requirements
        .add(event_id, job, req.daily_rate)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequirementResponse::from(requirement)),
    ))
}

/// `PUT /events/:id/requirements` — Reconcile the full requirement set.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] when any desired rate is invalid
/// (nothing is applied), [`GatewayError::EventNotFound`] for unknown
/// events.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}/requirements",
    tag = "Requirements",
    summary = "Replace the requirement set",
    description = "Reconciles the event's requirements against the full desired set: missing roles are created, absent ones removed (clearing subscriber references), surviving rates updated. An empty set removes everything.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = ReplaceRequirementsRequest,
    responses(
        (status = 200, description = "Reconciliation counts", body = ReplaceOutcomeResponse),
        (status = 400, description = "Invalid rate or job", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn replace_requirements(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<ReplaceRequirementsRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let desired = req
        .requirements
        .into_iter()
        .map(AddRequirementRequest::into_spec)
        .collect();
    let outcome = state.requirements.replace_set(event_id, desired).await?;
    Ok(Json(ReplaceOutcomeResponse::from(outcome)))
}

/// `PATCH /requirements/:id` — Update a requirement's daily rate.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] for an invalid rate,
/// [`GatewayError::RequirementNotFound`] for unknown ids.
#[utoipa::path(
    patch,
    path = "/api/v1/requirements/{id}",
    tag = "Requirements",
    summary = "Update a requirement's rate",
    description = "Changes the daily rate of an existing requirement.",
    params(
        ("id" = uuid::Uuid, Path, description = "Requirement UUID"),
    ),
    request_body = UpdateRateRequest,
    responses(
        (status = 200, description = "Rate updated", body = Ack),
        (status = 400, description = "Invalid rate", body = ErrorResponse),
        (status = 404, description = "Requirement not found", body = ErrorResponse),
    )
)]
pub async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateRateRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let requirement_id = crate::domain::RequirementId::from_uuid(id);
    state
        .requirements
        .update_rate(requirement_id, req.daily_rate)
        .await?;
    Ok(Json(Ack::ok()))
}

/// `DELETE /requirements/:id` — Remove a requirement.
///
/// # Errors
///
/// Returns [`GatewayError::RequirementNotFound`] for unknown ids.
#[utoipa::path(
    delete,
    path = "/api/v1/requirements/{id}",
    tag = "Requirements",
    summary = "Remove a requirement",
    description = "Removes a role. Subscribers who applied for it keep their registration with the requirement reference cleared.",
    params(
        ("id" = uuid::Uuid, Path, description = "Requirement UUID"),
    ),
    responses(
        (status = 204, description = "Requirement removed"),
        (status = 404, description = "Requirement not found", body = ErrorResponse),
    )
)]
pub async fn delete_requirement(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let requirement_id = crate::domain::RequirementId::from_uuid(id);
    state.requirements.remove(requirement_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Requirement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/requirements",
            post(add_requirement).put(replace_requirements),
        )
        .route(
            "/requirements/{id}",
            patch(update_rate).delete(delete_requirement),
        )
}
