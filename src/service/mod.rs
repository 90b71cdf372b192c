//! Service layer: workflow orchestration over the registry, the asset
//! store, the archive, and the view notifier.

pub mod acceptance;
pub mod eligibility;
pub mod export;
pub mod registration;
pub mod requirements;

pub use acceptance::AcceptanceService;
pub use eligibility::{EligibilityReason, EligibilityReport, EligibilityService};
pub use export::ExportService;
pub use registration::{RegistrationInput, RegistrationService};
pub use requirements::{RequirementService, RequirementSpec};
