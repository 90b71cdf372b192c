//! Database row models for the archive tables.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::DocumentType;
use crate::domain::ids::EventId;
use crate::domain::model::{Gender, JobRequirement, Subscriber};

/// Text encoding of [`Gender`] used in the `gender` column.
#[must_use]
pub const fn gender_str(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
    }
}

/// Text encoding of [`DocumentType`] used in the `document_type` column.
#[must_use]
pub const fn document_type_str(document_type: DocumentType) -> &'static str {
    match document_type {
        DocumentType::National => "national",
        DocumentType::ResidentPermit => "resident_permit",
    }
}

/// A subscriber row in the `subscribers` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberRow {
    /// Subscriber id.
    pub id: Uuid,
    /// Owning event id.
    pub event_id: Uuid,
    /// Referenced requirement id, when any.
    pub requirement_id: Option<Uuid>,
    /// Applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Identity number. Unique per event.
    pub identity_number: String,
    /// Document type text encoding.
    pub document_type: String,
    /// Identity document expiry date.
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Derived age at write time.
    pub age: i32,
    /// Gender text encoding.
    pub gender: String,
    /// City.
    pub city: String,
    /// Nationality.
    pub nationality: String,
    /// Normalized IBAN.
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Account holder.
    pub account_holder: String,
    /// Identity-document image URL.
    pub id_document_url: String,
    /// Personal photo URL.
    pub photo_url: String,
    /// Acceptance flag.
    pub accepted: bool,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<&Subscriber> for SubscriberRow {
    fn from(s: &Subscriber) -> Self {
        Self {
            id: *s.id.as_uuid(),
            event_id: *s.event_id.as_uuid(),
            requirement_id: s.requirement.map(|r| *r.as_uuid()),
            name: s.name.clone(),
            mobile: s.mobile.clone(),
            email: s.email.clone(),
            identity_number: s.identity_number.clone(),
            document_type: document_type_str(s.document_type).to_string(),
            id_expiry_date: s.id_expiry_date,
            birth_date: s.birth_date,
            age: i32::try_from(s.age).unwrap_or(i32::MAX),
            gender: gender_str(s.gender).to_string(),
            city: s.city.clone(),
            nationality: s.nationality.clone(),
            iban: s.iban.clone(),
            bank_name: s.bank_name.clone(),
            account_holder: s.account_holder.clone(),
            id_document_url: s.id_document_url.clone(),
            photo_url: s.photo_url.clone(),
            accepted: s.accepted,
            registered_at: s.registered_at,
        }
    }
}

/// A requirement row in the `requirements` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRow {
    /// Requirement id.
    pub id: Uuid,
    /// Owning event id.
    pub event_id: Uuid,
    /// Catalog job id.
    pub job_id: String,
    /// Catalog job display name.
    pub job_name: String,
    /// Daily rate.
    pub daily_rate: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl RequirementRow {
    /// Builds a row from a requirement and its owning event.
    #[must_use]
    pub fn from_requirement(event_id: EventId, requirement: &JobRequirement) -> Self {
        Self {
            id: *requirement.id.as_uuid(),
            event_id: *event_id.as_uuid(),
            job_id: requirement.job.id.clone(),
            job_name: requirement.job.name.clone(),
            daily_rate: requirement.daily_rate,
            created_at: requirement.created_at,
        }
    }
}
