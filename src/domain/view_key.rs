//! Logical view keys for cache/view invalidation.
//!
//! Every mutation enumerates the logical views it makes stale. The core
//! is agnostic to how consumers re-render or re-cache; it only
//! guarantees it announces the correct key set.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::EventId;

/// Identifier for a page/listing that must be treated as stale after a
/// mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// Public event listing.
    PublicEventList,
    /// Public detail page of one event.
    PublicEventDetail(EventId),
    /// Admin event listing.
    AdminEventList,
    /// Admin subscriber roster of one event.
    AdminRoster(EventId),
    /// Global admin subscriber aggregate (cross-event counts).
    AdminSubscriberSummary,
}

impl ViewKey {
    /// Stable string encoding used on the wire and in logs.
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            Self::PublicEventList => "public:events".to_string(),
            Self::PublicEventDetail(id) => format!("public:event:{id}"),
            Self::AdminEventList => "admin:events".to_string(),
            Self::AdminRoster(id) => format!("admin:roster:{id}"),
            Self::AdminSubscriberSummary => "admin:subscribers".to_string(),
        }
    }

    /// The full key set affected by any mutation under one event: both
    /// public views, both admin event views, and the global subscriber
    /// aggregate.
    #[must_use]
    pub fn for_event(event_id: EventId) -> Vec<Self> {
        vec![
            Self::PublicEventList,
            Self::PublicEventDetail(event_id),
            Self::AdminEventList,
            Self::AdminRoster(event_id),
            Self::AdminSubscriberSummary,
        ]
    }
}

impl Serialize for ViewKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

/// Broadcast payload announcing a set of stale views.
#[derive(Debug, Clone, Serialize)]
pub struct ViewInvalidation {
    /// Stale view keys.
    pub keys: Vec<ViewKey>,
    /// When the mutation completed.
    pub timestamp: DateTime<Utc>,
}

impl ViewInvalidation {
    /// Creates an invalidation stamped with the current time.
    #[must_use]
    pub fn now(keys: Vec<ViewKey>) -> Self {
        Self {
            keys,
            timestamp: Utc::now(),
        }
    }
}
