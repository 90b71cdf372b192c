//! Event-related DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::Event;

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Date the event takes place.
    pub date: NaiveDate,
    /// Location reference.
    pub location: String,
}

/// Request body for `PATCH /events/{id}`. Omitted fields are unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEventRequest {
    /// New value for the registration gate.
    #[serde(default)]
    pub accepting_applications: Option<bool>,
    /// New value for the public-visibility flag.
    #[serde(default)]
    pub published: Option<bool>,
    /// New value for the completed flag.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Full event representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventResponse {
    /// Event identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: crate::domain::EventId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Event date.
    pub date: NaiveDate,
    /// Location reference.
    pub location: String,
    /// Whether public registration is open.
    pub accepting_applications: bool,
    /// Whether the event is publicly visible.
    pub published: bool,
    /// Whether the event has concluded.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            accepting_applications: event.accepting_applications,
            published: event.published,
            completed: event.completed,
            created_at: event.created_at,
        }
    }
}
