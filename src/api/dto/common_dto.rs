//! Shared DTOs used across resources.

use serde::Serialize;
use utoipa::ToSchema;

/// Minimal success acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct Ack {
    /// Always `true` on the success path.
    pub success: bool,
}

impl Ack {
    /// The canonical success acknowledgement.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
