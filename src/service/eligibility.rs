//! Eligibility gate: advisory pre-registration check.
//!
//! Combines the identity validator with a duplicate lookup so the public
//! form can give a fast, friendly answer before the full registration
//! workflow runs. Advisory only: the registry commit under the per-event
//! write lock is the final authority (see the registration workflow).

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::EventId;
use crate::domain::identity::{DocumentType, validate_identity};
use crate::domain::registry::EventRegistry;
use crate::error::GatewayError;

/// Why an identity number cannot register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityReason {
    /// Identity number is malformed.
    Format,
    /// Identity number fails the check-digit verification.
    Checksum,
    /// Identity number is already registered for this event.
    Duplicate,
}

/// Result of an eligibility check.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EligibilityReport {
    /// Whether the identity number itself is well-formed and passes the
    /// checksum.
    pub valid: bool,
    /// Whether the identity number is already registered for the event.
    pub duplicate: bool,
    /// Document type, when the number is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    /// Why registration would fail, when it would.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<EligibilityReason>,
}

impl EligibilityReport {
    /// Report for an eligible identity number.
    #[must_use]
    pub const fn eligible(document_type: DocumentType) -> Self {
        Self {
            valid: true,
            duplicate: false,
            document_type: Some(document_type),
            reason: None,
        }
    }
}

/// Advisory eligibility check service.
#[derive(Debug, Clone)]
pub struct EligibilityService {
    registry: Arc<EventRegistry>,
}

impl EligibilityService {
    /// Creates a new `EligibilityService`.
    #[must_use]
    pub fn new(registry: Arc<EventRegistry>) -> Self {
        Self { registry }
    }

    /// Answers "can this identity number register for this event".
    ///
    /// Validator first; on success, a duplicate lookup against the
    /// event's roster.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the event does not
    /// exist. Validator failures and duplicates are reported in the
    /// [`EligibilityReport`], not as errors.
    pub async fn check(
        &self,
        event_id: EventId,
        identity_number: &str,
    ) -> Result<EligibilityReport, GatewayError> {
        let entry_lock = self.registry.get(event_id).await?;

        let document_type = match validate_identity(identity_number) {
            Ok(document_type) => document_type,
            Err(err) => {
                let reason = match err {
                    GatewayError::IdentityChecksum { .. } => EligibilityReason::Checksum,
                    _ => EligibilityReason::Format,
                };
                return Ok(EligibilityReport {
                    valid: false,
                    duplicate: false,
                    document_type: None,
                    reason: Some(reason),
                });
            }
        };

        let entry = entry_lock.read().await;
        if entry.find_by_identity(identity_number).is_some() {
            return Ok(EligibilityReport {
                valid: true,
                duplicate: true,
                document_type: Some(document_type),
                reason: Some(EligibilityReason::Duplicate),
            });
        }

        Ok(EligibilityReport::eligible(document_type))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::model::Event;
    use chrono::NaiveDate;

    async fn make_service() -> (EligibilityService, Arc<EventRegistry>, EventId) {
        let registry = Arc::new(EventRegistry::new());
        let Some(date) = NaiveDate::from_ymd_opt(2026, 10, 1) else {
            panic!("valid date");
        };
        let event = Event::new(
            "Derby".to_string(),
            "League derby".to_string(),
            date,
            "Stadium".to_string(),
        );
        let Ok(event_id) = registry.insert_event(event).await else {
            panic!("event insert failed");
        };
        (
            EligibilityService::new(Arc::clone(&registry)),
            registry,
            event_id,
        )
    }

    #[tokio::test]
    async fn valid_unregistered_number_is_eligible() {
        let (service, _, event_id) = make_service().await;
        let Ok(report) = service.check(event_id, "1000000008").await else {
            panic!("check failed");
        };
        assert!(report.valid);
        assert!(!report.duplicate);
        assert_eq!(report.document_type, Some(DocumentType::National));
        assert_eq!(report.reason, None);
    }

    #[tokio::test]
    async fn malformed_number_reports_format() {
        let (service, _, event_id) = make_service().await;
        let Ok(report) = service.check(event_id, "12345").await else {
            panic!("check failed");
        };
        assert!(!report.valid);
        assert_eq!(report.reason, Some(EligibilityReason::Format));
    }

    #[tokio::test]
    async fn checksum_failure_reports_checksum() {
        let (service, _, event_id) = make_service().await;
        let Ok(report) = service.check(event_id, "1000000000").await else {
            panic!("check failed");
        };
        assert!(!report.valid);
        assert_eq!(report.reason, Some(EligibilityReason::Checksum));
    }

    #[tokio::test]
    async fn unknown_event_is_an_error() {
        let (service, _, _) = make_service().await;
        let result = service.check(EventId::new(), "1000000008").await;
        assert!(matches!(result, Err(GatewayError::EventNotFound(_))));
    }
}
