//! Subscriber-related DTOs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::assets::RawAsset;
use crate::domain::identity::DocumentType;
use crate::domain::model::{Gender, Subscriber};
use crate::domain::{RequirementId, SubscriberId};
use crate::error::GatewayError;
use crate::service::RegistrationInput;

/// Query parameters for the eligibility pre-check.
#[derive(Debug, Deserialize, IntoParams)]
pub struct EligibilityQuery {
    /// Identity number to check.
    pub identity_number: String,
}

/// An image sent inline as base64.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageUploadDto {
    /// Original file name.
    pub file_name: String,
    /// MIME content type.
    pub content_type: String,
    /// Base64-encoded file bytes.
    pub data: String,
}

impl ImageUploadDto {
    /// Decodes the base64 payload into a raw asset.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when the payload is not
    /// valid base64.
    pub fn decode(self) -> Result<RawAsset, GatewayError> {
        let bytes = BASE64.decode(self.data.as_bytes()).map_err(|_| {
            GatewayError::Validation(format!("{} is not valid base64", self.file_name))
        })?;
        Ok(RawAsset {
            file_name: self.file_name,
            content_type: self.content_type,
            bytes,
        })
    }
}

/// Request body for `POST /events/{id}/subscribers`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Full applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Claimed identity number.
    pub identity_number: String,
    /// Identity document expiry date, when provided.
    #[serde(default)]
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Applicant gender.
    pub gender: Gender,
    /// City of residence.
    pub city: String,
    /// Nationality.
    pub nationality: String,
    /// IBAN as submitted.
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Account holder name.
    pub account_holder: String,
    /// Requirement the applicant applies for, if any.
    #[serde(default)]
    #[schema(value_type = Option<uuid::Uuid>)]
    pub requirement_id: Option<RequirementId>,
    /// Identity-document image.
    pub id_document: ImageUploadDto,
    /// Personal photo.
    pub photo: ImageUploadDto,
}

impl RegisterRequest {
    /// Decodes both images and produces the workflow input.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when either image payload is
    /// not valid base64.
    pub fn into_input(self) -> Result<RegistrationInput, GatewayError> {
        let id_document = self.id_document.decode()?;
        let photo = self.photo.decode()?;
        Ok(RegistrationInput {
            name: self.name,
            mobile: self.mobile,
            email: self.email,
            identity_number: self.identity_number,
            id_expiry_date: self.id_expiry_date,
            birth_date: self.birth_date,
            gender: self.gender,
            city: self.city,
            nationality: self.nationality,
            iban: self.iban,
            bank_name: self.bank_name,
            account_holder: self.account_holder,
            requirement: self.requirement_id,
            id_document,
            photo,
        })
    }
}

/// Full subscriber representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubscriberResponse {
    /// Subscriber identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: SubscriberId,
    /// Event this registration belongs to.
    #[schema(value_type = uuid::Uuid)]
    pub event_id: crate::domain::EventId,
    /// Requirement applied for, if any.
    #[schema(value_type = Option<uuid::Uuid>)]
    pub requirement_id: Option<RequirementId>,
    /// Full applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Identity number.
    pub identity_number: String,
    /// Document type derived from the identity number.
    pub document_type: DocumentType,
    /// Identity document expiry date, when provided.
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Derived age.
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
    /// Account holder name.
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

impl From<Subscriber> for SubscriberResponse {
    fn from(s: Subscriber) -> Self {
        Self {
            id: s.id,
            event_id: s.event_id,
            requirement_id: s.requirement,
            name: s.name,
            mobile: s.mobile,
            email: s.email,
            identity_number: s.identity_number,
            document_type: s.document_type,
            id_expiry_date: s.id_expiry_date,
            birth_date: s.birth_date,
            age: s.age,
            gender: s.gender,
            city: s.city,
            nationality: s.nationality,
            iban: s.iban,
            bank_name: s.bank_name,
            account_holder: s.account_holder,
            id_document_url: s.id_document_url,
            photo_url: s.photo_url,
            accepted: s.accepted,
            registered_at: s.registered_at,
        }
    }
}

/// Request body for `PATCH /subscribers/{id}/accepted`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAcceptedRequest {
    /// New acceptance state.
    pub accepted: bool,
}

/// Request body for the bulk acceptance endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkAcceptedRequest {
    /// Subscribers to update.
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub subscriber_ids: Vec<SubscriberId>,
    /// New acceptance state for all of them.
    pub accepted: bool,
}

/// Response for the bulk acceptance endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkAcceptedResponse {
    /// Number of subscribers actually updated.
    pub updated: usize,
}

/// Roster listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterResponse {
    /// Subscribers ordered by registration time.
    pub data: Vec<SubscriberResponse>,
    /// Total number of subscribers in the roster.
    pub total: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn image_decode_roundtrip() {
        let dto = ImageUploadDto {
            file_name: "id.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: BASE64.encode([1u8, 2, 3]),
        };
        let Ok(asset) = dto.decode() else {
            panic!("decode failed");
        };
        assert_eq!(asset.bytes, vec![1, 2, 3]);
        assert_eq!(asset.file_name, "id.jpg");
    }

    #[test]
    fn invalid_base64_is_validation_error() {
        let dto = ImageUploadDto {
            file_name: "id.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: "not base64!!".to_string(),
        };
        assert!(matches!(dto.decode(), Err(GatewayError::Validation(_))));
    }
}
