//! Data Transfer Objects for REST request/response serialization.
//!
//! Inline image payloads travel as base64; identifiers are UUIDs.

pub mod common_dto;
pub mod event_dto;
pub mod requirement_dto;
pub mod subscriber_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use requirement_dto::*;
pub use subscriber_dto::*;
