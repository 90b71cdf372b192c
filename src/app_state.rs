//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::registry::EventRegistry;
use crate::domain::ViewNotifier;
use crate::persistence::PostgresArchive;
use crate::service::{
    AcceptanceService, EligibilityService, ExportService, RegistrationService, RequirementService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event registry (direct reads for list/detail endpoints).
    pub registry: Arc<EventRegistry>,
    /// Advisory eligibility gate.
    pub eligibility: Arc<EligibilityService>,
    /// Registration workflow.
    pub registration: Arc<RegistrationService>,
    /// Acceptance workflow.
    pub acceptance: Arc<AcceptanceService>,
    /// Job-requirement binding.
    pub requirements: Arc<RequirementService>,
    /// Roster export.
    pub export: Arc<ExportService>,
    /// View-invalidation notifier for WebSocket subscriptions.
    pub notifier: ViewNotifier,
    /// Optional write-through archive for event rows.
    pub archive: Option<PostgresArchive>,
}
