//! Domain layer: identifiers, identity validation, derived fields,
//! entities, the event registry, and the view-invalidation notifier.

pub mod fields;
pub mod identity;
pub mod ids;
pub mod model;
pub mod notifier;
pub mod registry;
pub mod view_key;

pub use ids::{EventId, RequirementId, SubscriberId};
pub use model::{Event, EventSummary, Gender, Job, JobRequirement, NewSubscriber, Subscriber};
pub use notifier::ViewNotifier;
pub use registry::{EventEntry, EventFlags, EventRegistry, ReplaceOutcome};
pub use view_key::{ViewInvalidation, ViewKey};
