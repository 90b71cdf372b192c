//! WebSocket layer: the view-invalidation feed.
//!
//! The endpoint at `/ws` is outbound-only: clients connect and receive a
//! JSON invalidation message for every batch of view keys a mutation
//! touches. Caching layers drop the named views and re-fetch on demand.

pub mod connection;
pub mod handler;
