//! Concurrent event storage with per-event fine-grained locking.
//!
//! [`EventRegistry`] stores every event aggregate in a `HashMap` where
//! each entry is individually protected by a [`tokio::sync::RwLock`].
//! Reads on the same event are concurrent; writes to different events
//! are concurrent; writes to the same event are serialized.
//!
//! The per-event write lock is the authoritative commit point for the
//! (event, identity number) uniqueness invariant: the advisory
//! eligibility check is a UX optimization, and a collision caught here
//! surfaces as the same [`GatewayError::DuplicateIdentity`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use super::ids::{EventId, RequirementId, SubscriberId};
use super::model::{Event, EventSummary, Job, JobRequirement, NewSubscriber, Subscriber};
use crate::error::GatewayError;

/// One event aggregate: the event record, its job requirements, its
/// subscribers, and the per-event identity-number index.
#[derive(Debug)]
pub struct EventEntry {
    /// The event record.
    pub event: Event,
    /// Open roles keyed by requirement id.
    pub requirements: HashMap<RequirementId, JobRequirement>,
    /// Registrations keyed by subscriber id.
    pub subscribers: HashMap<SubscriberId, Subscriber>,
    /// Identity number → subscriber id. Kept in lockstep with
    /// `subscribers`; the uniqueness arbiter.
    identity_index: HashMap<String, SubscriberId>,
}

impl EventEntry {
    /// Wraps a freshly created event with empty collections.
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self {
            event,
            requirements: HashMap::new(),
            subscribers: HashMap::new(),
            identity_index: HashMap::new(),
        }
    }

    /// Looks up a subscriber by identity number.
    #[must_use]
    pub fn find_by_identity(&self, identity_number: &str) -> Option<&Subscriber> {
        self.identity_index
            .get(identity_number)
            .and_then(|id| self.subscribers.get(id))
    }

    /// Commits a new subscriber. Authoritative uniqueness check: a
    /// second registration with the same identity number fails here
    /// even when both passed the advisory gate.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::DuplicateIdentity`] on an identity collision.
    /// - [`GatewayError::Validation`] when the referenced requirement
    ///   does not belong to this event.
    pub fn insert_subscriber(&mut self, new: NewSubscriber) -> Result<Subscriber, GatewayError> {
        if self.identity_index.contains_key(&new.identity_number) {
            return Err(GatewayError::DuplicateIdentity);
        }
        if let Some(req_id) = new.requirement
            && !self.requirements.contains_key(&req_id)
        {
            return Err(GatewayError::Validation(
                "requirement does not belong to this event".to_string(),
            ));
        }

        let subscriber = Subscriber::from_new(self.event.id, new);
        self.identity_index
            .insert(subscriber.identity_number.clone(), subscriber.id);
        self.subscribers.insert(subscriber.id, subscriber.clone());
        self.event.last_modified_at = Utc::now();
        Ok(subscriber)
    }

    /// Removes a subscriber, returning the record (with its asset
    /// references) so the caller can release the assets.
    pub fn remove_subscriber(&mut self, id: SubscriberId) -> Option<Subscriber> {
        let subscriber = self.subscribers.remove(&id)?;
        self.identity_index.remove(&subscriber.identity_number);
        self.event.last_modified_at = Utc::now();
        Some(subscriber)
    }

    /// Applies one acceptance value to every listed subscriber in a
    /// single pass. Unknown ids are skipped. Returns the ids actually
    /// present (idempotent: already-matching values count as applied).
    pub fn set_accepted_many(&mut self, ids: &[SubscriberId], accepted: bool) -> Vec<SubscriberId> {
        let mut applied = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(subscriber) = self.subscribers.get_mut(id) {
                subscriber.accepted = accepted;
                applied.push(*id);
            }
        }
        if !applied.is_empty() {
            self.event.last_modified_at = Utc::now();
        }
        applied
    }

    /// Clears the requirement reference of every subscriber pointing at
    /// the given requirement. Returns how many references were cleared.
    pub fn clear_requirement_refs(&mut self, requirement_id: RequirementId) -> usize {
        let mut cleared = 0;
        for subscriber in self.subscribers.values_mut() {
            if subscriber.requirement == Some(requirement_id) {
                subscriber.requirement = None;
                cleared += 1;
            }
        }
        cleared
    }

    /// Subscribers ordered by registration time (then id, for a total
    /// order).
    #[must_use]
    pub fn roster(&self) -> Vec<Subscriber> {
        let mut subscribers: Vec<Subscriber> = self.subscribers.values().cloned().collect();
        subscribers.sort_by(|a, b| {
            a.registered_at
                .cmp(&b.registered_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        subscribers
    }

    /// Lightweight summary for list endpoints.
    #[must_use]
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.event.id,
            title: self.event.title.clone(),
            date: self.event.date,
            location: self.event.location.clone(),
            accepting_applications: self.event.accepting_applications,
            published: self.event.published,
            completed: self.event.completed,
            subscriber_count: self.subscribers.len(),
            requirement_count: self.requirements.len(),
        }
    }
}

/// Optional flag updates for an event.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFlags {
    /// New value for `accepting_applications`, when set.
    pub accepting_applications: Option<bool>,
    /// New value for `published`, when set.
    pub published: Option<bool>,
    /// New value for `completed`, when set.
    pub completed: Option<bool>,
}

/// Outcome of a requirement-set reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Requirements created (present in desired, absent before).
    pub created: usize,
    /// Requirements whose rate was updated.
    pub updated: usize,
    /// Requirements removed (absent from desired).
    pub removed: usize,
    /// Subscriber requirement references cleared by removals.
    pub cleared_refs: usize,
}

/// Central store for all event aggregates.
///
/// Outer `RwLock<HashMap<...>>` plus per-event `Arc<RwLock<EventEntry>>`
/// for fine-grained locking, with global resolution indexes so that
/// subscriber- and requirement-scoped operations can find their owning
/// event without scanning.
///
/// Lock order: entry lock before index lock, never the reverse while an
/// entry lock is wanted.
#[derive(Debug, Default)]
pub struct EventRegistry {
    events: RwLock<HashMap<EventId, Arc<RwLock<EventEntry>>>>,
    subscriber_index: RwLock<HashMap<SubscriberId, EventId>>,
    requirement_index: RwLock<HashMap<RequirementId, EventId>>,
}

impl EventRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] if an event with the same ID
    /// already exists (should never happen with UUID v4).
    pub async fn insert_event(&self, event: Event) -> Result<EventId, GatewayError> {
        let event_id = event.id;
        let mut map = self.events.write().await;
        if map.contains_key(&event_id) {
            return Err(GatewayError::Validation(format!(
                "event {event_id} already exists"
            )));
        }
        map.insert(event_id, Arc::new(RwLock::new(EventEntry::new(event))));
        Ok(event_id)
    }

    /// Returns the entry lock for an event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the event does not
    /// exist.
    pub async fn get(&self, event_id: EventId) -> Result<Arc<RwLock<EventEntry>>, GatewayError> {
        let map = self.events.read().await;
        map.get(&event_id)
            .cloned()
            .ok_or(GatewayError::EventNotFound(event_id))
    }

    /// Summaries of all events, newest first.
    pub async fn list(&self) -> Vec<EventSummary> {
        let map = self.events.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            summaries.push(entry.summary());
        }
        drop(map);
        summaries.sort_by(|a, b| b.date.cmp(&a.date));
        summaries
    }

    /// Applies flag updates to an event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the event does not
    /// exist.
    pub async fn set_event_flags(
        &self,
        event_id: EventId,
        flags: EventFlags,
    ) -> Result<Event, GatewayError> {
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        if let Some(accepting) = flags.accepting_applications {
            entry.event.accepting_applications = accepting;
        }
        if let Some(published) = flags.published {
            entry.event.published = published;
        }
        if let Some(completed) = flags.completed {
            entry.event.completed = completed;
        }
        entry.event.last_modified_at = Utc::now();
        Ok(entry.event.clone())
    }

    /// Resolves the owning event of a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriberNotFound`] for unknown ids.
    pub async fn resolve_subscriber(&self, id: SubscriberId) -> Result<EventId, GatewayError> {
        self.subscriber_index
            .read()
            .await
            .get(&id)
            .copied()
            .ok_or(GatewayError::SubscriberNotFound(id))
    }

    /// Commits a validated subscriber under the per-event write lock.
    ///
    /// # Errors
    ///
    /// Propagates [`GatewayError::EventNotFound`],
    /// [`GatewayError::DuplicateIdentity`], or
    /// [`GatewayError::Validation`] from the entry commit.
    pub async fn commit_subscriber(
        &self,
        event_id: EventId,
        new: NewSubscriber,
    ) -> Result<Subscriber, GatewayError> {
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let subscriber = entry.insert_subscriber(new)?;
        self.subscriber_index
            .write()
            .await
            .insert(subscriber.id, event_id);
        Ok(subscriber)
    }

    /// Removes a subscriber, returning the record so its assets can be
    /// released.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriberNotFound`] when the id is
    /// unknown, [`GatewayError::EventNotFound`] when the owning event
    /// vanished.
    pub async fn remove_subscriber(&self, id: SubscriberId) -> Result<Subscriber, GatewayError> {
        let event_id = self.resolve_subscriber(id).await?;
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let subscriber = entry
            .remove_subscriber(id)
            .ok_or(GatewayError::SubscriberNotFound(id))?;
        self.subscriber_index.write().await.remove(&id);
        Ok(subscriber)
    }

    /// Sets the acceptance flag of a single subscriber. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::SubscriberNotFound`] when the id is
    /// unknown.
    pub async fn set_accepted(
        &self,
        id: SubscriberId,
        accepted: bool,
    ) -> Result<EventId, GatewayError> {
        let event_id = self.resolve_subscriber(id).await?;
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let applied = entry.set_accepted_many(&[id], accepted);
        if applied.is_empty() {
            return Err(GatewayError::SubscriberNotFound(id));
        }
        Ok(event_id)
    }

    /// Applies one acceptance value to many subscribers. Ids are grouped
    /// by owning event and each group is applied as one batched write
    /// under that event's lock; unknown ids are silently skipped.
    ///
    /// Returns the affected events with the number of records updated in
    /// each.
    pub async fn bulk_set_accepted(
        &self,
        ids: &[SubscriberId],
        accepted: bool,
    ) -> Vec<(EventId, usize)> {
        let mut by_event: HashMap<EventId, Vec<SubscriberId>> = HashMap::new();
        {
            let index = self.subscriber_index.read().await;
            for id in ids {
                if let Some(event_id) = index.get(id) {
                    by_event.entry(*event_id).or_default().push(*id);
                }
            }
        }

        let mut results = Vec::with_capacity(by_event.len());
        for (event_id, group) in by_event {
            let Ok(entry_lock) = self.get(event_id).await else {
                continue;
            };
            let mut entry = entry_lock.write().await;
            let applied = entry.set_accepted_many(&group, accepted);
            if !applied.is_empty() {
                results.push((event_id, applied.len()));
            }
        }
        results
    }

    /// Resolves the owning event of a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequirementNotFound`] for unknown ids.
    pub async fn resolve_requirement(&self, id: RequirementId) -> Result<EventId, GatewayError> {
        self.requirement_index
            .read()
            .await
            .get(&id)
            .copied()
            .ok_or(GatewayError::RequirementNotFound(id))
    }

    /// Adds a job requirement to an event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the event does not
    /// exist.
    pub async fn add_requirement(
        &self,
        event_id: EventId,
        requirement: JobRequirement,
    ) -> Result<RequirementId, GatewayError> {
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let requirement_id = requirement.id;
        entry.requirements.insert(requirement_id, requirement);
        entry.event.last_modified_at = Utc::now();
        self.requirement_index
            .write()
            .await
            .insert(requirement_id, event_id);
        Ok(requirement_id)
    }

    /// Updates the daily rate of a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequirementNotFound`] when the id is
    /// unknown, [`GatewayError::EventNotFound`] when the owning event
    /// vanished.
    pub async fn update_requirement_rate(
        &self,
        id: RequirementId,
        daily_rate: f64,
    ) -> Result<EventId, GatewayError> {
        let event_id = self.resolve_requirement(id).await?;
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let requirement = entry
            .requirements
            .get_mut(&id)
            .ok_or(GatewayError::RequirementNotFound(id))?;
        requirement.daily_rate = daily_rate;
        entry.event.last_modified_at = Utc::now();
        Ok(event_id)
    }

    /// Removes a requirement, clearing the reference of any subscriber
    /// still pointing at it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RequirementNotFound`] when the id is
    /// unknown, [`GatewayError::EventNotFound`] when the owning event
    /// vanished.
    pub async fn remove_requirement(
        &self,
        id: RequirementId,
    ) -> Result<(EventId, usize), GatewayError> {
        let event_id = self.resolve_requirement(id).await?;
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        entry
            .requirements
            .remove(&id)
            .ok_or(GatewayError::RequirementNotFound(id))?;
        let cleared = entry.clear_requirement_refs(id);
        entry.event.last_modified_at = Utc::now();
        self.requirement_index.write().await.remove(&id);
        Ok((event_id, cleared))
    }

    /// Reconciles an event's requirement set against a desired set keyed
    /// by job id: creates missing requirements, removes absent ones
    /// (clearing subscriber references), and updates surviving rates.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] when the event does not
    /// exist.
    pub async fn replace_requirements(
        &self,
        event_id: EventId,
        desired: Vec<(Job, f64)>,
    ) -> Result<ReplaceOutcome, GatewayError> {
        let entry_lock = self.get(event_id).await?;
        let mut entry = entry_lock.write().await;
        let mut outcome = ReplaceOutcome::default();

        let desired_by_job: HashMap<String, (Job, f64)> = desired
            .into_iter()
            .map(|(job, rate)| (job.id.clone(), (job, rate)))
            .collect();

        // Remove requirements whose job is absent from the desired set.
        let stale: Vec<RequirementId> = entry
            .requirements
            .values()
            .filter(|req| !desired_by_job.contains_key(&req.job.id))
            .map(|req| req.id)
            .collect();
        {
            let mut index = self.requirement_index.write().await;
            for req_id in &stale {
                entry.requirements.remove(req_id);
                index.remove(req_id);
            }
        }
        for req_id in &stale {
            outcome.cleared_refs += entry.clear_requirement_refs(*req_id);
        }
        outcome.removed = stale.len();

        // Update survivors, create the rest.
        let existing_jobs: HashMap<String, RequirementId> = entry
            .requirements
            .values()
            .map(|req| (req.job.id.clone(), req.id))
            .collect();
        for (job_id, (job, rate)) in desired_by_job {
            if let Some(req_id) = existing_jobs.get(&job_id) {
                if let Some(requirement) = entry.requirements.get_mut(req_id) {
                    requirement.daily_rate = rate;
                    outcome.updated += 1;
                }
            } else {
                let requirement = JobRequirement::new(job, rate);
                let req_id = requirement.id;
                entry.requirements.insert(req_id, requirement);
                self.requirement_index.write().await.insert(req_id, event_id);
                outcome.created += 1;
            }
        }

        entry.event.last_modified_at = Utc::now();
        Ok(outcome)
    }

    /// Returns the number of events in the registry.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns `true` if the registry contains no events.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::identity::DocumentType;
    use crate::domain::model::Gender;
    use chrono::NaiveDate;

    fn make_event() -> Event {
        let Some(date) = NaiveDate::from_ymd_opt(2026, 10, 1) else {
            panic!("valid date");
        };
        let mut event = Event::new(
            "Season Opening".to_string(),
            "Stadium opening night".to_string(),
            date,
            "King Fahd Stadium".to_string(),
        );
        event.published = true;
        event.accepting_applications = true;
        event
    }

    fn make_new_subscriber(identity_number: &str) -> NewSubscriber {
        let Some(birth) = NaiveDate::from_ymd_opt(2000, 1, 1) else {
            panic!("valid date");
        };
        NewSubscriber {
            name: "Ahmed".to_string(),
            mobile: "0551234567".to_string(),
            email: "ahmed@example.com".to_string(),
            identity_number: identity_number.to_string(),
            document_type: DocumentType::National,
            id_expiry_date: None,
            birth_date: birth,
            age: 26,
            gender: Gender::Male,
            city: "Riyadh".to_string(),
            nationality: "Saudi".to_string(),
            iban: "SA0380000000608010167519".to_string(),
            bank_name: "Al Rajhi".to_string(),
            account_holder: "Ahmed".to_string(),
            requirement: None,
            id_document_url: "https://assets.local/ids/a.jpg".to_string(),
            id_document_ref: "a".to_string(),
            photo_url: "https://assets.local/photos/b.jpg".to_string(),
            photo_ref: "b".to_string(),
        }
    }

    async fn registry_with_event() -> (EventRegistry, EventId) {
        let registry = EventRegistry::new();
        let Ok(event_id) = registry.insert_event(make_event()).await else {
            panic!("event insert failed");
        };
        (registry, event_id)
    }

    #[tokio::test]
    async fn duplicate_identity_rejected_within_event() {
        let (registry, event_id) = registry_with_event().await;

        let first = registry
            .commit_subscriber(event_id, make_new_subscriber("1000000008"))
            .await;
        assert!(first.is_ok());

        let second = registry
            .commit_subscriber(event_id, make_new_subscriber("1000000008"))
            .await;
        assert!(matches!(second, Err(GatewayError::DuplicateIdentity)));
    }

    #[tokio::test]
    async fn same_identity_allowed_on_different_event() {
        let (registry, event_a) = registry_with_event().await;
        let Ok(event_b) = registry.insert_event(make_event()).await else {
            panic!("event insert failed");
        };

        assert!(
            registry
                .commit_subscriber(event_a, make_new_subscriber("1000000008"))
                .await
                .is_ok()
        );
        assert!(
            registry
                .commit_subscriber(event_b, make_new_subscriber("1000000008"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn commit_rejects_foreign_requirement() {
        let (registry, event_id) = registry_with_event().await;
        let mut new = make_new_subscriber("1000000008");
        new.requirement = Some(RequirementId::new());

        let result = registry.commit_subscriber(event_id, new).await;
        assert!(matches!(result, Err(GatewayError::Validation(_))));
    }

    #[tokio::test]
    async fn bulk_acceptance_is_idempotent_and_skips_unknown() {
        let (registry, event_id) = registry_with_event().await;
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
        ids.push(SubscriberId::new()); // unknown, silently skipped

        for _ in 0..2 {
            let results = registry.bulk_set_accepted(&ids, true).await;
            assert_eq!(results, vec![(event_id, 3)]);
        }

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        assert!(entry.subscribers.values().all(|s| s.accepted));
    }

    #[tokio::test]
    async fn remove_subscriber_returns_asset_refs_and_frees_identity() {
        let (registry, event_id) = registry_with_event().await;
        let Ok(subscriber) = registry
            .commit_subscriber(event_id, make_new_subscriber("1000000008"))
            .await
        else {
            panic!("commit failed");
        };

        let Ok(removed) = registry.remove_subscriber(subscriber.id).await else {
            panic!("remove failed");
        };
        assert_eq!(removed.id_document_ref, "a");
        assert_eq!(removed.photo_ref, "b");

        // Identity is free for re-registration after removal.
        assert!(
            registry
                .commit_subscriber(event_id, make_new_subscriber("1000000008"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn remove_requirement_clears_subscriber_refs() {
        let (registry, event_id) = registry_with_event().await;
        let requirement = JobRequirement::new(
            Job {
                id: "usher".to_string(),
                name: "Usher".to_string(),
            },
            250.0,
        );
        let Ok(req_id) = registry.add_requirement(event_id, requirement).await else {
            panic!("add failed");
        };

        let mut new = make_new_subscriber("1000000008");
        new.requirement = Some(req_id);
        let Ok(subscriber) = registry.commit_subscriber(event_id, new).await else {
            panic!("commit failed");
        };

        let Ok((_, cleared)) = registry.remove_requirement(req_id).await else {
            panic!("remove failed");
        };
        assert_eq!(cleared, 1);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        let Some(stored) = entry.subscribers.get(&subscriber.id) else {
            panic!("subscriber missing");
        };
        assert_eq!(stored.requirement, None);
    }

    #[tokio::test]
    async fn replace_with_empty_set_removes_everything() {
        let (registry, event_id) = registry_with_event().await;
        for job_id in ["usher", "gate"] {
            let requirement = JobRequirement::new(
                Job {
                    id: job_id.to_string(),
                    name: job_id.to_string(),
                },
                100.0,
            );
            assert!(registry.add_requirement(event_id, requirement).await.is_ok());
        }

        let Ok(outcome) = registry.replace_requirements(event_id, Vec::new()).await else {
            panic!("replace failed");
        };
        assert_eq!(outcome.removed, 2);
        assert_eq!(outcome.created, 0);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        assert!(entry.requirements.is_empty());
    }

    #[tokio::test]
    async fn replace_reconciles_created_updated_removed() {
        let (registry, event_id) = registry_with_event().await;
        let usher = Job {
            id: "usher".to_string(),
            name: "Usher".to_string(),
        };
        let gate = Job {
            id: "gate".to_string(),
            name: "Gate Steward".to_string(),
        };
        let supervisor = Job {
            id: "supervisor".to_string(),
            name: "Supervisor".to_string(),
        };

        assert!(
            registry
                .add_requirement(event_id, JobRequirement::new(usher.clone(), 200.0))
                .await
                .is_ok()
        );
        assert!(
            registry
                .add_requirement(event_id, JobRequirement::new(gate, 150.0))
                .await
                .is_ok()
        );

        // Keep usher (new rate), drop gate, add supervisor.
        let Ok(outcome) = registry
            .replace_requirements(event_id, vec![(usher, 275.0), (supervisor, 400.0)])
            .await
        else {
            panic!("replace failed");
        };
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.removed, 1);

        let Ok(entry_lock) = registry.get(event_id).await else {
            panic!("event not found");
        };
        let entry = entry_lock.read().await;
        assert_eq!(entry.requirements.len(), 2);
        let rates: Vec<f64> = entry
            .requirements
            .values()
            .filter(|r| r.job.id == "usher")
            .map(|r| r.daily_rate)
            .collect();
        assert_eq!(rates, vec![275.0]);
    }
}
