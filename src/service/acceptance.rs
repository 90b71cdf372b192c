//! Acceptance workflow: single and bulk toggles of the accepted flag.

use std::sync::Arc;

use crate::domain::registry::EventRegistry;
use crate::domain::view_key::ViewKey;
use crate::domain::{SubscriberId, ViewNotifier};
use crate::error::GatewayError;
use crate::persistence::PostgresArchive;

/// Administrator-facing acceptance toggles.
#[derive(Debug, Clone)]
pub struct AcceptanceService {
    registry: Arc<EventRegistry>,
    notifier: ViewNotifier,
    archive: Option<PostgresArchive>,
}

impl AcceptanceService {
    /// Creates a new `AcceptanceService`.
    #[must_use]
    pub fn new(
        registry: Arc<EventRegistry>,
        notifier: ViewNotifier,
        archive: Option<PostgresArchive>,
    ) -> Self {
        Self {
            registry,
            notifier,
            archive,
        }
    }

    /// Sets the acceptance flag of one subscriber. Setting the value it
    /// already holds is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriberNotFound`] for unknown ids.
    pub async fn set_accepted(
        &self,
        subscriber_id: SubscriberId,
        accepted: bool,
    ) -> Result<(), GatewayError> {
        let event_id = self.registry.set_accepted(subscriber_id, accepted).await?;

        if let Some(archive) = &self.archive
            && let Err(err) = archive.set_accepted(&[subscriber_id], accepted).await
        {
            tracing::warn!(subscriber_id = %subscriber_id, error = %err,
                "archive acceptance update failed");
        }

        tracing::info!(subscriber_id = %subscriber_id, event_id = %event_id, accepted,
            "acceptance updated");
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(())
    }

    /// Applies one acceptance value to every listed subscriber. Ids are
    /// grouped by owning event and each group is written as one batch;
    /// unknown ids are silently skipped. Returns the number of records
    /// updated.
    pub async fn bulk_set_accepted(&self, subscriber_ids: &[SubscriberId], accepted: bool) -> usize {
        let results = self.registry.bulk_set_accepted(subscriber_ids, accepted).await;
        let updated: usize = results.iter().map(|(_, count)| count).sum();

        if updated > 0 {
            if let Some(archive) = &self.archive
                && let Err(err) = archive.set_accepted(subscriber_ids, accepted).await
            {
                tracing::warn!(error = %err, "archive bulk acceptance update failed");
            }

            let mut seen = std::collections::HashSet::new();
            let mut keys = Vec::new();
            for (event_id, _) in &results {
                for key in ViewKey::for_event(*event_id) {
                    if seen.insert(key) {
                        keys.push(key);
                    }
                }
            }
            self.notifier.notify(keys);
        }

        tracing::info!(requested = subscriber_ids.len(), updated, accepted,
            "bulk acceptance applied");
        updated
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::identity::DocumentType;
    use crate::domain::model::{Event, Gender, NewSubscriber};
    use crate::domain::EventId;
    use chrono::NaiveDate;

    fn make_new_subscriber(identity_number: &str) -> NewSubscriber {
        let Some(birth) = NaiveDate::from_ymd_opt(1998, 5, 20) else {
            panic!("valid date");
        };
        NewSubscriber {
            name: "Salem".to_string(),
            mobile: "0509876543".to_string(),
            email: "salem@example.com".to_string(),
            identity_number: identity_number.to_string(),
            document_type: DocumentType::National,
            id_expiry_date: None,
            birth_date: birth,
            age: 28,
            gender: Gender::Male,
            city: "Dammam".to_string(),
            nationality: "Saudi".to_string(),
            iban: "SA0380000000608010167519".to_string(),
            bank_name: "Riyad Bank".to_string(),
            account_holder: "Salem".to_string(),
            requirement: None,
            id_document_url: "memory://ids/x".to_string(),
            id_document_ref: "x".to_string(),
            photo_url: "memory://photos/y".to_string(),
            photo_ref: "y".to_string(),
        }
    }

    async fn seeded() -> (AcceptanceService, Arc<EventRegistry>, EventId, Vec<SubscriberId>) {
        let registry = Arc::new(EventRegistry::new());
        let Some(date) = NaiveDate::from_ymd_opt(2026, 11, 15) else {
            panic!("valid date");
        };
        let Ok(event_id) = registry
            .insert_event(Event::new(
                "Concert".to_string(),
                "Arena concert".to_string(),
                date,
                "Arena".to_string(),
            ))
            .await
        else {
            panic!("event insert failed");
        };

        let mut ids = Vec::new();
        for number in ["1000000008", "2000000006", "7000000005"] {
            let Ok(subscriber) = registry
                .commit_subscriber(event_id, make_new_subscriber(number))
                .await
            else {
                panic!("commit failed");
            };
            ids.push(subscriber.id);
        }

        let service = AcceptanceService::new(Arc::clone(&registry), ViewNotifier::new(64), None);
        (service, registry, event_id, ids)
    }

    #[tokio::test]
    async fn single_toggle_is_idempotent() {
        let (service, registry, event_id, ids) = seeded().await;
        let Some(first) = ids.first().copied() else {
            panic!("missing id");
        };

        assert!(service.set_accepted(first, true).await.is_ok());
        assert!(service.set_accepted(first, true).await.is_ok());

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        let Some(subscriber) = entry.subscribers.get(&first) else {
            panic!("subscriber missing");
        };
        assert!(subscriber.accepted);
    }

    #[tokio::test]
    async fn single_toggle_unknown_id_is_not_found() {
        let (service, _, _, _) = seeded().await;
        let result = service.set_accepted(SubscriberId::new(), true).await;
        assert!(matches!(result, Err(GatewayError::SubscriberNotFound(_))));
    }

    #[tokio::test]
    async fn bulk_applies_once_and_again_idempotently() {
        let (service, registry, event_id, ids) = seeded().await;

        assert_eq!(service.bulk_set_accepted(&ids, true).await, 3);
        assert_eq!(service.bulk_set_accepted(&ids, true).await, 3);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        assert!(entry.subscribers.values().all(|s| s.accepted));
    }

    #[tokio::test]
    async fn bulk_skips_unknown_ids() {
        let (service, _, _, mut ids) = seeded().await;
        ids.push(SubscriberId::new());
        ids.push(SubscriberId::new());

        assert_eq!(service.bulk_set_accepted(&ids, true).await, 3);
    }

    #[tokio::test]
    async fn toggles_notify_event_views() {
        let (service, _, event_id, ids) = seeded().await;
        let mut rx = service.notifier.subscribe();

        service.bulk_set_accepted(&ids, false).await;
        let Ok(invalidation) = rx.recv().await else {
            panic!("expected invalidation");
        };
        assert!(invalidation.keys.contains(&ViewKey::AdminRoster(event_id)));
    }
}
