//! Registration workflow: validate, upload, commit, notify.
//!
//! Ordering is fixed: both image uploads complete before the record
//! commit, and no upload is attempted after the commit. When a later
//! step fails, already-uploaded assets are released best-effort so a
//! failed registration leaves no orphan (the deletion failure itself is
//! only logged; the caller sees the primary error).

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::assets::{AssetFolder, AssetStore, RawAsset, UploadedAsset};
use crate::domain::fields::{age_at, normalize_iban};
use crate::domain::identity::validate_identity;
use crate::domain::model::{Gender, NewSubscriber, Subscriber};
use crate::domain::registry::EventRegistry;
use crate::domain::view_key::ViewKey;
use crate::domain::{EventId, RequirementId, SubscriberId, ViewNotifier};
use crate::error::GatewayError;
use crate::persistence::PostgresArchive;

/// Validated-shape registration payload with decoded image bytes.
///
/// Derived fields (`age`, normalized IBAN) are computed by the workflow;
/// any values the client sent for them are ignored.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    /// Full applicant name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// Email address.
    pub email: String,
    /// Claimed identity number.
    pub identity_number: String,
    /// Identity document expiry date, when provided.
    pub id_expiry_date: Option<NaiveDate>,
    /// Birth date.
    pub birth_date: NaiveDate,
    /// Applicant gender.
    pub gender: Gender,
    /// City of residence.
    pub city: String,
    /// Nationality.
    pub nationality: String,
    /// IBAN as submitted (normalized by the workflow).
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Account holder name.
    pub account_holder: String,
    /// Requirement applied for, if any.
    pub requirement: Option<RequirementId>,
    /// Identity-document image.
    pub id_document: RawAsset,
    /// Personal photo.
    pub photo: RawAsset,
}

/// Orchestrator for public registration and subscriber deletion.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    registry: Arc<EventRegistry>,
    assets: Arc<dyn AssetStore>,
    notifier: ViewNotifier,
    archive: Option<PostgresArchive>,
    upload_timeout: Duration,
}

impl RegistrationService {
    /// Creates a new `RegistrationService`.
    #[must_use]
    pub fn new(
        registry: Arc<EventRegistry>,
        assets: Arc<dyn AssetStore>,
        notifier: ViewNotifier,
        archive: Option<PostgresArchive>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            assets,
            notifier,
            archive,
            upload_timeout,
        }
    }

    /// Registers an applicant for an event.
    ///
    /// Steps: payload validation, event gate (published and accepting),
    /// advisory duplicate re-check, derived fields, both uploads, the
    /// authoritative commit, archive write-through, view invalidation.
    ///
    /// # Errors
    ///
    /// Identity format/checksum errors, validation failures,
    /// event-not-found, duplicate identity, or upload failures. No
    /// partial record is ever committed.
    pub async fn register(
        &self,
        event_id: EventId,
        input: RegistrationInput,
    ) -> Result<Subscriber, GatewayError> {
        let document_type = validate_payload(&input)?;

        // Event gate + advisory duplicate re-check. The payload may
        // arrive long after the advisory eligibility call.
        {
            let entry_lock = self.registry.get(event_id).await?;
            let entry = entry_lock.read().await;
            if !entry.event.published || !entry.event.accepting_applications {
                return Err(GatewayError::Validation(
                    "event is not accepting applications".to_string(),
                ));
            }
            if entry.find_by_identity(&input.identity_number).is_some() {
                return Err(GatewayError::DuplicateIdentity);
            }
        }

        let age = age_at(input.birth_date, Utc::now());
        let iban = normalize_iban(&input.iban);

        // Uploads before commit, never after.
        let id_document = self
            .upload(input.id_document.clone(), AssetFolder::IdentityDocuments)
            .await?;
        let photo = match self.upload(input.photo.clone(), AssetFolder::Photos).await {
            Ok(photo) => photo,
            Err(err) => {
                self.release_asset(&id_document.asset_id).await;
                return Err(err);
            }
        };

        let new = NewSubscriber {
            name: input.name,
            mobile: input.mobile,
            email: input.email,
            identity_number: input.identity_number,
            document_type,
            id_expiry_date: input.id_expiry_date,
            birth_date: input.birth_date,
            age,
            gender: input.gender,
            city: input.city,
            nationality: input.nationality,
            iban,
            bank_name: input.bank_name,
            account_holder: input.account_holder,
            requirement: input.requirement,
            id_document_url: id_document.url.clone(),
            id_document_ref: id_document.asset_id.clone(),
            photo_url: photo.url.clone(),
            photo_ref: photo.asset_id.clone(),
        };

        let subscriber = match self.registry.commit_subscriber(event_id, new).await {
            Ok(subscriber) => subscriber,
            Err(err) => {
                // Commit failed after both uploads: compensate.
                self.release_uploads(&id_document, &photo).await;
                return Err(err);
            }
        };

        if let Some(archive) = &self.archive {
            match archive.insert_subscriber(&subscriber).await {
                Ok(()) => {}
                Err(GatewayError::DuplicateIdentity) => {
                    // The durable store is the final arbiter: undo the
                    // in-memory commit and report the duplicate.
                    let _ = self.registry.remove_subscriber(subscriber.id).await;
                    self.release_uploads(&id_document, &photo).await;
                    return Err(GatewayError::DuplicateIdentity);
                }
                Err(err) => {
                    tracing::warn!(subscriber_id = %subscriber.id, error = %err,
                        "archive write-through failed");
                }
            }
        }

        tracing::info!(
            subscriber_id = %subscriber.id,
            event_id = %event_id,
            document_type = ?subscriber.document_type,
            "subscriber registered"
        );
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(subscriber)
    }

    /// Deletes a subscriber, releasing its two asset references.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriberNotFound`] for unknown ids.
    pub async fn delete(&self, subscriber_id: SubscriberId) -> Result<(), GatewayError> {
        let subscriber = self.registry.remove_subscriber(subscriber_id).await?;

        self.release_asset(&subscriber.id_document_ref).await;
        self.release_asset(&subscriber.photo_ref).await;

        if let Some(archive) = &self.archive
            && let Err(err) = archive.delete_subscriber(subscriber_id).await
        {
            tracing::warn!(subscriber_id = %subscriber_id, error = %err,
                "archive delete failed");
        }

        tracing::info!(subscriber_id = %subscriber_id, event_id = %subscriber.event_id,
            "subscriber deleted");
        self.notifier.notify(ViewKey::for_event(subscriber.event_id));
        Ok(())
    }

    /// Uploads one file, bounded by the configured timeout.
    async fn upload(
        &self,
        file: RawAsset,
        folder: AssetFolder,
    ) -> Result<UploadedAsset, GatewayError> {
        match tokio::time::timeout(self.upload_timeout, self.assets.upload(file, folder)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Upload(format!(
                "upload to {folder} timed out after {:?}",
                self.upload_timeout
            ))),
        }
    }

    /// Best-effort release of both uploads after a failed commit.
    async fn release_uploads(&self, id_document: &UploadedAsset, photo: &UploadedAsset) {
        self.release_asset(&id_document.asset_id).await;
        self.release_asset(&photo.asset_id).await;
    }

    /// Best-effort asset deletion; failures are logged, never surfaced.
    async fn release_asset(&self, asset_ref: &str) {
        if let Err(err) = self.assets.delete(asset_ref).await {
            tracing::warn!(asset_ref, error = %err, "asset release failed");
        }
    }
}

/// Shape validation of the registration payload. Returns the document
/// type derived from the identity number.
fn validate_payload(
    input: &RegistrationInput,
) -> Result<crate::domain::identity::DocumentType, GatewayError> {
    let required = [
        ("name", &input.name),
        ("mobile", &input.mobile),
        ("email", &input.email),
        ("city", &input.city),
        ("nationality", &input.nationality),
        ("iban", &input.iban),
        ("bank_name", &input.bank_name),
        ("account_holder", &input.account_holder),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(GatewayError::Validation(format!("{field} is required")));
        }
    }

    let document_type = validate_identity(&input.identity_number)?;

    if input.birth_date >= Utc::now().date_naive() {
        return Err(GatewayError::Validation(
            "birth date must be in the past".to_string(),
        ));
    }
    if input.id_document.bytes.is_empty() {
        return Err(GatewayError::Validation(
            "identity document image is required".to_string(),
        ));
    }
    if input.photo.bytes.is_empty() {
        return Err(GatewayError::Validation(
            "personal photo is required".to_string(),
        ));
    }

    Ok(document_type)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetStore;
    use crate::domain::model::{Event, Job, JobRequirement};
    use crate::service::eligibility::EligibilityService;

    fn make_input(identity_number: &str) -> RegistrationInput {
        let Some(birth) = NaiveDate::from_ymd_opt(2000, 1, 1) else {
            panic!("valid date");
        };
        RegistrationInput {
            name: "Noura".to_string(),
            mobile: "0567891234".to_string(),
            email: "noura@example.com".to_string(),
            identity_number: identity_number.to_string(),
            id_expiry_date: None,
            birth_date: birth,
            gender: Gender::Female,
            city: "Jeddah".to_string(),
            nationality: "Saudi".to_string(),
            iban: " sa03 8000 0000 6080 1016 7519 ".to_string(),
            bank_name: "SNB".to_string(),
            account_holder: "Noura".to_string(),
            requirement: None,
            id_document: RawAsset {
                file_name: "id.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![1, 2, 3],
            },
            photo: RawAsset {
                file_name: "photo.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![4, 5, 6],
            },
        }
    }

    async fn open_event(registry: &EventRegistry) -> EventId {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 10, 1) else {
            panic!("valid date");
        };
        let mut event = Event::new(
            "Final".to_string(),
            "Cup final".to_string(),
            date,
            "Stadium".to_string(),
        );
        event.published = true;
        event.accepting_applications = true;
        let Ok(event_id) = registry.insert_event(event).await else {
            panic!("event insert failed");
        };
        event_id
    }

    fn make_service(store: Arc<MemoryAssetStore>) -> (RegistrationService, Arc<EventRegistry>) {
        let registry = Arc::new(EventRegistry::new());
        let notifier = ViewNotifier::new(64);
        let service = RegistrationService::new(
            Arc::clone(&registry),
            store,
            notifier,
            None,
            Duration::from_secs(5),
        );
        (service, registry)
    }

    #[tokio::test]
    async fn register_commits_with_derived_fields() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;
        let mut rx = service.notifier.subscribe();

        let Ok(subscriber) = service.register(event_id, make_input("1000000008")).await else {
            panic!("register failed");
        };

        assert!(!subscriber.accepted);
        assert_eq!(subscriber.iban, "SA0380000000608010167519");
        let Some(birth) = NaiveDate::from_ymd_opt(2000, 1, 1) else {
            panic!("valid date");
        };
        assert_eq!(subscriber.age, age_at(birth, Utc::now()));
        assert_eq!(store.len().await, 2);

        let Ok(invalidation) = rx.recv().await else {
            panic!("expected invalidation");
        };
        assert_eq!(invalidation.keys.len(), 5);
        assert!(invalidation.keys.contains(&ViewKey::AdminRoster(event_id)));
    }

    #[tokio::test]
    async fn second_registration_same_identity_is_duplicate() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;

        assert!(service.register(event_id, make_input("1000000008")).await.is_ok());
        let second = service.register(event_id, make_input("1000000008")).await;
        assert!(matches!(second, Err(GatewayError::DuplicateIdentity)));
        // Only the first registration's assets remain.
        assert_eq!(store.len().await, 2);

        // The eligibility gate agrees: duplicate here, free elsewhere.
        let eligibility = EligibilityService::new(Arc::clone(&registry));
        let Ok(report) = eligibility.check(event_id, "1000000008").await else {
            panic!("check failed");
        };
        assert!(report.duplicate);

        let other_event = open_event(&registry).await;
        let Ok(report) = eligibility.check(other_event, "1000000008").await else {
            panic!("check failed");
        };
        assert!(!report.duplicate);
    }

    #[tokio::test]
    async fn failed_photo_upload_aborts_and_releases_first_asset() {
        let store = Arc::new(MemoryAssetStore::failing_after(1));
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;

        let result = service.register(event_id, make_input("1000000008")).await;
        assert!(matches!(result, Err(GatewayError::Upload(_))));
        assert!(store.is_empty().await);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        assert!(entry_lock.read().await.subscribers.is_empty());
    }

    #[tokio::test]
    async fn failed_commit_releases_both_assets() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;

        // Foreign requirement passes shape validation but fails at the
        // authoritative commit, after both uploads.
        let mut input = make_input("1000000008");
        input.requirement = Some(RequirementId::new());

        let result = service.register(event_id, input).await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn closed_event_rejects_registration() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(store);
        let event_id = open_event(&registry).await;
        let Ok(_) = registry
            .set_event_flags(
                event_id,
                crate::domain::EventFlags {
                    accepting_applications: Some(false),
                    ..Default::default()
                },
            )
            .await
        else {
            panic!("flag update failed");
        };

        let result = service.register(event_id, make_input("1000000008")).await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn invalid_identity_rejected_before_any_upload() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;

        let result = service.register(event_id, make_input("1000000000")).await;
        assert!(matches!(
            result,
            Err(GatewayError::IdentityChecksum { .. })
        ));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn register_with_requirement_binds_it() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(store);
        let event_id = open_event(&registry).await;
        let requirement = JobRequirement::new(
            Job {
                id: "usher".to_string(),
                name: "Usher".to_string(),
            },
            300.0,
        );
        let Ok(req_id) = registry.add_requirement(event_id, requirement).await else {
            panic!("add failed");
        };

        let mut input = make_input("1000000008");
        input.requirement = Some(req_id);
        let Ok(subscriber) = service.register(event_id, input).await else {
            panic!("register failed");
        };
        assert_eq!(subscriber.requirement, Some(req_id));
    }

    #[tokio::test]
    async fn delete_releases_assets_and_frees_identity() {
        let store = Arc::new(MemoryAssetStore::new());
        let (service, registry) = make_service(Arc::clone(&store));
        let event_id = open_event(&registry).await;

        let Ok(subscriber) = service.register(event_id, make_input("1000000008")).await else {
            panic!("register failed");
        };
        assert_eq!(store.len().await, 2);

        assert!(service.delete(subscriber.id).await.is_ok());
        assert!(store.is_empty().await);
        assert!(service.register(event_id, make_input("1000000008")).await.is_ok());
    }
}
