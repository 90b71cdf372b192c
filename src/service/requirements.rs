//! Job-requirement binding: open roles and their daily rates.

use std::sync::Arc;

use crate::domain::model::{Job, JobRequirement};
use crate::domain::registry::{EventRegistry, ReplaceOutcome};
use crate::domain::view_key::ViewKey;
use crate::domain::{EventId, RequirementId, ViewNotifier};
use crate::error::GatewayError;
use crate::persistence::PostgresArchive;

/// One desired requirement in a reconciliation request.
#[derive(Debug, Clone)]
pub struct RequirementSpec {
    /// Catalog job to open.
    pub job: Job,
    /// Daily rate offered. Zero or positive.
    pub daily_rate: f64,
}

/// Administrator-facing requirement management.
#[derive(Debug, Clone)]
pub struct RequirementService {
    registry: Arc<EventRegistry>,
    notifier: ViewNotifier,
    archive: Option<PostgresArchive>,
}

impl RequirementService {
    /// Creates a new `RequirementService`.
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

    /// Opens a role on an event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a negative or non-finite
    /// rate or an empty job id, [`GatewayError::EventNotFound`] for an
    /// unknown event.
    pub async fn add(
        &self,
        event_id: EventId,
        job: Job,
        daily_rate: f64,
    ) -> Result<JobRequirement, GatewayError> {
        validate_rate(daily_rate)?;
        if job.id.trim().is_empty() {
            return Err(GatewayError::Validation("job id is required".to_string()));
        }

        let requirement = JobRequirement::new(job, daily_rate);
        let stored = requirement.clone();
        self.registry.add_requirement(event_id, requirement).await?;

        if let Some(archive) = &self.archive
            && let Err(err) = archive.save_requirement(event_id, &stored).await
        {
            tracing::warn!(requirement_id = %stored.id, error = %err,
                "archive requirement save failed");
        }

        tracing::info!(requirement_id = %stored.id, event_id = %event_id,
            job = %stored.job.id, daily_rate, "requirement added");
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(stored)
    }

    /// Updates the daily rate of an existing requirement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an invalid rate,
    /// [`GatewayError::RequirementNotFound`] for an unknown id.
    pub async fn update_rate(
        &self,
        requirement_id: RequirementId,
        daily_rate: f64,
    ) -> Result<(), GatewayError> {
        validate_rate(daily_rate)?;
        let event_id = self
            .registry
            .update_requirement_rate(requirement_id, daily_rate)
            .await?;

        if let Some(archive) = &self.archive
            && let Err(err) = archive
                .update_requirement_rate(requirement_id, daily_rate)
                .await
        {
            tracing::warn!(requirement_id = %requirement_id, error = %err,
                "archive rate update failed");
        }

        tracing::info!(requirement_id = %requirement_id, event_id = %event_id, daily_rate,
            "requirement rate updated");
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(())
    }

    /// Removes a requirement, clearing the reference of any subscriber
    /// still pointing at it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequirementNotFound`] for an unknown id.
    pub async fn remove(&self, requirement_id: RequirementId) -> Result<(), GatewayError> {
        let (event_id, cleared) = self.registry.remove_requirement(requirement_id).await?;

        if let Some(archive) = &self.archive
            && let Err(err) = archive.delete_requirement(requirement_id).await
        {
            tracing::warn!(requirement_id = %requirement_id, error = %err,
                "archive requirement delete failed");
        }

        tracing::info!(requirement_id = %requirement_id, event_id = %event_id, cleared,
            "requirement removed");
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(())
    }

    /// Reconciles an event's requirement set against a full desired set:
    /// creates missing roles, removes absent ones (clearing subscriber
    /// references), updates surviving rates.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] when any desired rate is
    /// invalid (nothing is applied), [`GatewayError::EventNotFound`] for
    /// an unknown event.
    pub async fn replace_set(
        &self,
        event_id: EventId,
        desired: Vec<RequirementSpec>,
    ) -> Result<ReplaceOutcome, GatewayError> {
        for spec in &desired {
            validate_rate(spec.daily_rate)?;
            if spec.job.id.trim().is_empty() {
                return Err(GatewayError::Validation("job id is required".to_string()));
            }
        }

        let desired: Vec<(Job, f64)> = desired
            .into_iter()
            .map(|spec| (spec.job, spec.daily_rate))
            .collect();
        let outcome = self.registry.replace_requirements(event_id, desired).await?;

        if let Some(archive) = &self.archive {
            let entry_lock = self.registry.get(event_id).await?;
            let requirements: Vec<JobRequirement> = {
                let entry = entry_lock.read().await;
                entry.requirements.values().cloned().collect()
            };
            if let Err(err) = archive.sync_requirements(event_id, &requirements).await {
                tracing::warn!(event_id = %event_id, error = %err,
                    "archive requirement sync failed");
            }
        }

        tracing::info!(
            event_id = %event_id,
            created = outcome.created,
            updated = outcome.updated,
            removed = outcome.removed,
            cleared_refs = outcome.cleared_refs,
            "requirement set reconciled"
        );
        self.notifier.notify(ViewKey::for_event(event_id));
        Ok(outcome)
    }
}

/// Rejects negative or non-finite daily rates.
fn validate_rate(daily_rate: f64) -> Result<(), GatewayError> {
    if !daily_rate.is_finite() || daily_rate < 0.0 {
        return Err(GatewayError::Validation(
            "daily rate must be zero or positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::model::Event;
    use chrono::NaiveDate;

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    async fn make_service() -> (RequirementService, Arc<EventRegistry>, EventId) {
        let registry = Arc::new(EventRegistry::new());
        let Some(date) = NaiveDate::from_ymd_opt(2026, 12, 1) else {
            panic!("valid date");
        };
        let Ok(event_id) = registry
            .insert_event(Event::new(
                "Race".to_string(),
                "Street race".to_string(),
                date,
                "Corniche".to_string(),
            ))
            .await
        else {
            panic!("event insert failed");
        };
        let service = RequirementService::new(Arc::clone(&registry), ViewNotifier::new(64), None);
        (service, registry, event_id)
    }

    #[tokio::test]
    async fn negative_rate_is_rejected_everywhere() {
        let (service, _, event_id) = make_service().await;

        assert!(matches!(
            service.add(event_id, job("usher"), -1.0).await,
            Err(GatewayError::Validation(_))
        ));

        let Ok(requirement) = service.add(event_id, job("usher"), 100.0).await else {
            panic!("add failed");
        };
        assert!(matches!(
            service.update_rate(requirement.id, -0.5).await,
            Err(GatewayError::Validation(_))
        ));

        assert!(matches!(
            service
                .replace_set(
                    event_id,
                    vec![RequirementSpec {
                        job: job("gate"),
                        daily_rate: f64::NAN,
                    }],
                )
                .await,
            Err(GatewayError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn zero_rate_is_allowed() {
        let (service, _, event_id) = make_service().await;
        assert!(service.add(event_id, job("volunteer"), 0.0).await.is_ok());
    }

    #[tokio::test]
    async fn replace_empty_set_removes_all() {
        let (service, registry, event_id) = make_service().await;
        assert!(service.add(event_id, job("usher"), 100.0).await.is_ok());
        assert!(service.add(event_id, job("gate"), 150.0).await.is_ok());

        let Ok(outcome) = service.replace_set(event_id, Vec::new()).await else {
            panic!("replace failed");
        };
        assert_eq!(outcome.removed, 2);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        assert!(entry_lock.read().await.requirements.is_empty());
    }

    #[tokio::test]
    async fn mutations_notify_event_views() {
        let (service, _, event_id) = make_service().await;
        let mut rx = service.notifier.subscribe();

        assert!(service.add(event_id, job("usher"), 100.0).await.is_ok());
        let Ok(invalidation) = rx.recv().await else {
            panic!("expected invalidation");
        };
        assert!(
            invalidation
                .keys
                .contains(&ViewKey::PublicEventDetail(event_id))
        );
    }

    #[tokio::test]
    async fn update_rate_unknown_requirement_is_not_found() {
        let (service, _, _) = make_service().await;
        let result = service.update_rate(RequirementId::new(), 10.0).await;
        assert!(matches!(result, Err(GatewayError::RequirementNotFound(_))));
    }
}
