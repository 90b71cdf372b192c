//! Typed domain entities.
//!
//! Explicit per-entity structures at the core boundary: the registry and
//! services never accept or return untyped records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::identity::DocumentType;
use super::ids::{EventId, RequirementId, SubscriberId};

/// Applicant gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male applicant.
    Male,
    /// Female applicant.
    Female,
}

/// Catalog job entry (immutable reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Job {
    /// Stable catalog identifier (e.g. `"usher"`).
    pub id: String,
    /// Display name.
    pub name: String,
}

/// An event members of the public can apply to work at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier (immutable after creation).
    pub id: EventId,
    /// Event title.
    pub title: String,
    /// Event description.
    pub description: String,
    /// Date the event takes place.
    pub date: NaiveDate,
    /// Location reference (venue name or identifier).
    pub location: String,
    /// Whether public registration is open.
    pub accepting_applications: bool,
    /// Whether the event is visible on public listings.
    pub published: bool,
    /// Whether the event has concluded.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation touching this event's aggregate.
    pub last_modified_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new unpublished event that is not yet accepting
    /// applications.
    #[must_use]
    pub fn new(title: String, description: String, date: NaiveDate, location: String) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            title,
            description,
            date,
            location,
            accepting_applications: false,
            published: false,
            completed: false,
            created_at: now,
            last_modified_at: now,
        }
    }
}

/// An event-scoped open role with a daily pay rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequirement {
    /// Unique requirement identifier.
    pub id: RequirementId,
    /// Catalog job this requirement opens.
    pub job: Job,
    /// Daily rate offered for the role. Zero or positive.
    pub daily_rate: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl JobRequirement {
    /// Creates a new requirement for the given job and rate.
    #[must_use]
    pub fn new(job: Job, daily_rate: f64) -> Self {
        Self {
            id: RequirementId::new(),
            job,
            daily_rate,
            created_at: Utc::now(),
        }
    }
}

/// Validated, derived-field-complete input for a subscriber commit.
///
/// Built by the registration workflow after payload validation, derived
/// field computation, and asset upload; the registry turns it into a
/// [`Subscriber`] at the authoritative commit point.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    /// Full applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Validated identity number.
    pub identity_number: String,
    /// Document type derived from the identity number.
    pub document_type: DocumentType,
    /// Identity document expiry date, when provided.
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date as supplied by the applicant.
    pub birth_date: NaiveDate,
    /// Age derived from the birth date at write time.
    pub age: u32,
    /// Applicant gender.
    pub gender: Gender,
    /// City of residence.
    pub city: String,
    /// Nationality (catalog reference, stored denormalized).
    pub nationality: String,
    /// Normalized IBAN (no whitespace, uppercase).
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Bank account holder name.
    pub account_holder: String,
    /// Requirement the applicant applied for, if any.
    pub requirement: Option<RequirementId>,
    /// Uploaded identity-document image URL.
    pub id_document_url: String,
    /// Asset id of the identity-document image.
    pub id_document_ref: String,
    /// Uploaded personal photo URL.
    pub photo_url: String,
    /// Asset id of the personal photo.
    pub photo_ref: String,
}

/// A committed registration record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    /// Unique subscriber identifier.
    pub id: SubscriberId,
    /// Event this registration belongs to.
    pub event_id: EventId,
    /// Requirement (of the same event) the applicant applied for.
    pub requirement: Option<RequirementId>,
    /// Full applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Validated identity number. Unique per event.
    pub identity_number: String,
    /// Document type derived from the identity number.
    pub document_type: DocumentType,
    /// Identity document expiry date, when provided.
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Age derived from the birth date at write time.
    pub age: u32,
    /// Applicant gender.
    pub gender: Gender,
    /// City of residence.
    pub city: String,
    /// Nationality.
    pub nationality: String,
    /// Normalized IBAN.
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Bank account holder name.
    pub account_holder: String,
    /// Identity-document image URL.
    pub id_document_url: String,
    /// Asset id of the identity-document image.
    pub id_document_ref: String,
    /// Personal photo URL.
    pub photo_url: String,
    /// Asset id of the personal photo.
    pub photo_ref: String,
    /// Acceptance flag. Defaults to `false`; toggled by administrators.
    pub accepted: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl Subscriber {
    /// Materializes a committed record from validated input.
    #[must_use]
    pub fn from_new(event_id: EventId, new: NewSubscriber) -> Self {
        Self {
            id: SubscriberId::new(),
            event_id,
            requirement: new.requirement,
            name: new.name,
            mobile: new.mobile,
            email: new.email,
            identity_number: new.identity_number,
            document_type: new.document_type,
            id_expiry_date: new.id_expiry_date,
            birth_date: new.birth_date,
            age: new.age,
            gender: new.gender,
            city: new.city,
            nationality: new.nationality,
            iban: new.iban,
            bank_name: new.bank_name,
            account_holder: new.account_holder,
            id_document_url: new.id_document_url,
            id_document_ref: new.id_document_ref,
            photo_url: new.photo_url,
            photo_ref: new.photo_ref,
            accepted: false,
            registered_at: Utc::now(),
        }
    }
}

/// Lightweight event summary for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventSummary {
    /// Event identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: EventId,
    /// Event title.
    pub title: String,
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
    /// Number of registered subscribers.
    pub subscriber_count: usize,
    /// Number of open requirements.
    pub requirement_count: usize,
}
