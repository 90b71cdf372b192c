//! Event handlers: create, list, detail, flag updates, roster export.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{CreateEventRequest, EventResponse, RequirementResponse, UpdateEventRequest};
use crate::app_state::AppState;
use crate::domain::model::{Event, EventSummary};
use crate::domain::registry::EventFlags;
use crate::domain::view_key::ViewKey;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events` — Create a new event.
///
/// New events start unpublished and closed to applications.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] on an invalid payload.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates a new event. Events start unpublished and not accepting applications; use the flag update endpoint to open them.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    if req.title.trim().is_empty() {
        return Err(GatewayError::Validation("title is required".to_string()));
    }

    let event = Event::new(req.title, req.description, req.date, req.location);
    let response = EventResponse::from(event.clone());
    let event_id = state.registry.insert_event(event.clone()).await?;

    if let Some(archive) = &state.archive
        && let Err(err) = archive.save_event(&event).await
    {
        tracing::warn!(event_id = %event_id, error = %err, "archive event save failed");
    }

    tracing::info!(event_id = %event_id, "event created");
    state.notifier.notify(ViewKey::for_event(event_id));
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /events` — List all events, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns summaries of all events ordered by date, newest first.",
    responses(
        (status = 200, description = "Event summaries", body = Vec<EventSummary>),
    )
)]
pub async fn list_events(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = state.registry.list().await;
    Json(summaries)
}

/// `GET /events/:id` — Event details with its open requirements.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for unknown events.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns full event details including its open job requirements and subscriber count.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = serde_json::Value),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let entry_lock = state.registry.get(event_id).await?;
    let entry = entry_lock.read().await;

    let mut requirements: Vec<RequirementResponse> = entry
        .requirements
        .values()
        .cloned()
        .map(RequirementResponse::from)
        .collect();
    requirements.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let response = serde_json::json!({
        "event": EventResponse::from(entry.event.clone()),
        "requirements": requirements,
        "subscriber_count": entry.subscribers.len(),
    });

    Ok(Json(response))
}

/// `PATCH /events/:id` — Update event flags.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for unknown events.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update event flags",
    description = "Toggles the accepting_applications, published, and completed flags. Omitted flags are left unchanged.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let flags = EventFlags {
        accepting_applications: req.accepting_applications,
        published: req.published,
        completed: req.completed,
    };
    let event = state.registry.set_event_flags(event_id, flags).await?;

    if let Some(archive) = &state.archive
        && let Err(err) = archive.save_event(&event).await
    {
        tracing::warn!(event_id = %event_id, error = %err, "archive event save failed");
    }

    tracing::info!(event_id = %event_id, "event flags updated");
    state.notifier.notify(ViewKey::for_event(event_id));
    Ok(Json(EventResponse::from(event)))
}

/// `GET /events/:id/export` — Download the roster as CSV.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] for unknown events and
/// [`GatewayError::NothingToExport`] when the roster is empty.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/export",
    tag = "Events",
    summary = "Export the roster as CSV",
    description = "Returns the event's subscriber roster as a BOM-prefixed, fully quoted CSV document ordered by registration time.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 422, description = "Roster is empty", body = ErrorResponse),
    )
)]
pub async fn export_roster(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = crate::domain::EventId::from_uuid(id);
    let csv = state.export.export(event_id).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"roster-{event_id}.csv\""),
            ),
        ],
        csv,
    ))
}

/// Event management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route("/events/{id}", get(get_event).patch(update_event))
        .route("/events/{id}/export", get(export_roster))
}
