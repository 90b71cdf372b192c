//! Subscriber handlers: eligibility, registration, roster, acceptance,
//! deletion.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    Ack, BulkAcceptedRequest, BulkAcceptedResponse, EligibilityQuery, RegisterRequest,
    RosterResponse, SetAcceptedRequest, SubscriberResponse,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::EligibilityReport;

/// `GET /events/:id/eligibility` — Advisory pre-registration check.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for unknown events.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/eligibility",
    tag = "Subscribers",
    summary = "Check registration eligibility",
    description = "Validates an identity number and checks whether it is already registered for the event. Advisory: the registration itself re-checks under the write lock.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        EligibilityQuery,
    ),
    responses(
        (status = 200, description = "Eligibility report", body = EligibilityReport),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn check_eligibility(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<EligibilityQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let report = state
        .eligibility
        .check(event_id, &query.identity_number)
        .await?;
    Ok(Json(report))
}

/// `POST /events/:id/subscribers` — Register an applicant.
///
/// # Errors
///
/// Returns the registration error taxonomy: identity format/checksum,
/// validation, duplicate, event-not-found, upload.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/subscribers",
    tag = "Subscribers",
    summary = "Register for an event",
    description = "Validates the payload, uploads both images, and commits the registration. The identity number must be unique within the event.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration committed", body = SubscriberResponse),
        (status = 400, description = "Invalid payload or identity number", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Identity number already registered", body = ErrorResponse),
        (status = 502, description = "Image upload failed", body = ErrorResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let input = req.into_input()?;
    let subscriber = state.registration.register(event_id, input).await?;
    Ok((StatusCode::CREATED, Json(SubscriberResponse::from(subscriber))))
}

/// `GET /events/:id/subscribers` — Full roster of an event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for unknown events.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/subscribers",
    tag = "Subscribers",
    summary = "List the event roster",
    description = "Returns all subscribers of an event ordered by registration time.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Roster listing", body = RosterResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_roster(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let entry_lock = state.registry.get(event_id).await?;
    let entry = entry_lock.read().await;

    let data: Vec<SubscriberResponse> = entry
        .roster()
        .into_iter()
        .map(SubscriberResponse::from)
        .collect();
    let total = data.len();

    Ok(Json(RosterResponse { data, total }))
}

/// `PATCH /subscribers/:id/accepted` — Toggle one acceptance flag.
///
/// # Errors
///
/// Returns [`GatewayError::SubscriberNotFound`] for unknown ids.
#[utoipa::path(
    patch,
    path = "/api/v1/subscribers/{id}/accepted",
    tag = "Subscribers",
    summary = "Set a subscriber's acceptance flag",
    description = "Sets the accepted flag of one subscriber. Setting the value it already holds succeeds without change.",
    params(
        ("id" = uuid::Uuid, Path, description = "Subscriber UUID"),
    ),
    request_body = SetAcceptedRequest,
    responses(
        (status = 200, description = "Flag updated", body = Ack),
        (status = 404, description = "Subscriber not found", body = ErrorResponse),
    )
)]
pub async fn set_accepted(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<SetAcceptedRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let subscriber_id = crate::domain::SubscriberId::from_uuid(id);
    state
        .acceptance
        .set_accepted(subscriber_id, req.accepted)
        .await?;
    Ok(Json(Ack::ok()))
}

/// `POST /subscribers/accepted` — Bulk acceptance toggle.
#[utoipa::path(
    post,
    path = "/api/v1/subscribers/accepted",
    tag = "Subscribers",
    summary = "Bulk-set acceptance flags",
    description = "Applies one acceptance value to every listed subscriber. Unknown ids are skipped; the response reports how many records were updated.",
    request_body = BulkAcceptedRequest,
    responses(
        (status = 200, description = "Bulk update result", body = BulkAcceptedResponse),
    )
)]
pub async fn bulk_set_accepted(
    State(state): State<AppState>,
    Json(req): Json<BulkAcceptedRequest>,
) -> impl IntoResponse {
    let updated = state
        .acceptance
        .bulk_set_accepted(&req.subscriber_ids, req.accepted)
        .await;
    Json(BulkAcceptedResponse { updated })
}

/// `DELETE /subscribers/:id` — Remove a registration.
///
/// # Errors
///
/// Returns [`GatewayError::SubscriberNotFound`] for unknown ids.
#[utoipa::path(
    delete,
    path = "/api/v1/subscribers/{id}",
    tag = "Subscribers",
    summary = "Delete a subscriber",
    description = "Removes a registration, frees its identity number for the event, and releases both uploaded images.",
    params(
        ("id" = uuid::Uuid, Path, description = "Subscriber UUID"),
    ),
    responses(
        (status = 204, description = "Subscriber deleted"),
        (status = 404, description = "Subscriber not found", body = ErrorResponse),
    )
)]
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let subscriber_id = crate::domain::SubscriberId::from_uuid(id);
    state.registration.delete(subscriber_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Subscriber routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/eligibility", get(check_eligibility))
        .route(
            "/events/{id}/subscribers",
            post(register).get(list_roster),
        )
        .route("/subscribers/{id}/accepted", patch(set_accepted))
        .route("/subscribers/accepted", post(bulk_set_accepted))
        .route("/subscribers/{id}", delete(delete_subscriber))
}
