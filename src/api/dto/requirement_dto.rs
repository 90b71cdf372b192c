//! Job-requirement DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::model::{Job, JobRequirement};
use crate::domain::registry::ReplaceOutcome;
use crate::domain::RequirementId;
use crate::service::RequirementSpec;

/// Request body for `POST /events/{id}/requirements`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddRequirementRequest {
    /// Catalog job identifier.
    pub job_id: String,
    /// Job display name.
    pub job_name: String,
    /// Daily rate offered. Zero or positive.
    pub daily_rate: f64,
}

impl AddRequirementRequest {
    /// Converts the request into a reconciliation spec.
    #[must_use]
    pub fn into_spec(self) -> RequirementSpec {
        RequirementSpec {
            job: Job {
                id: self.job_id,
                name: self.job_name,
            },
            daily_rate: self.daily_rate,
        }
    }
}

/// Request body for `PATCH /requirements/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRateRequest {
    /// New daily rate. Zero or positive.
    pub daily_rate: f64,
}

/// Request body for the requirement-set reconciliation endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceRequirementsRequest {
    /// The full desired requirement set.
    pub requirements: Vec<AddRequirementRequest>,
}

/// Full requirement representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementResponse {
    /// Requirement identifier.
    #[schema(value_type = uuid::Uuid)]
    pub id: RequirementId,
    /// Catalog job identifier.
    pub job_id: String,
    /// Job display name.
    pub job_name: String,
    /// Daily rate offered.
    pub daily_rate: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<JobRequirement> for RequirementResponse {
    fn from(requirement: JobRequirement) -> Self {
        Self {
            id: requirement.id,
            job_id: requirement.job.id,
            job_name: requirement.job.name,
            daily_rate: requirement.daily_rate,
            created_at: requirement.created_at,
        }
    }
}

/// Result counts of a requirement-set reconciliation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceOutcomeResponse {
    /// Requirements created.
    pub created: usize,
    /// Requirements whose rate changed.
    pub updated: usize,
    /// Requirements removed.
    pub removed: usize,
    /// Subscriber references cleared by removals.
    pub cleared_refs: usize,
}

impl From<ReplaceOutcome> for ReplaceOutcomeResponse {
    fn from(outcome: ReplaceOutcome) -> Self {
        Self {
            created: outcome.created,
            updated: outcome.updated,
            removed: outcome.removed,
            cleared_refs: outcome.cleared_refs,
        }
    }
}
