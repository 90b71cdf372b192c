//! # crewreg-gateway
//!
//! Registration and subscriber-lifecycle service for public event crews.
//!
//! Members of the public register to work at events; administrators
//! manage events, job requirements, acceptance decisions, and roster
//! exports. Identity numbers are validated with a check-digit scheme and
//! are unique per event. All mutations publish view-invalidation keys
//! over a WebSocket feed so caching layers can drop stale views.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Feed (ws/)
//!     │
//!     ├── Services (service/): eligibility, registration,
//!     │   acceptance, requirements, export
//!     ├── ViewNotifier (domain/)
//!     │
//!     ├── EventRegistry (domain/)
//!     ├── AssetStore (assets/)
//!     │
//!     └── PostgreSQL archive (persistence/, optional)
//! ```

pub mod api;
pub mod app_state;
pub mod assets;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
