//! Persistence layer: optional PostgreSQL write-through archive.
//!
//! The in-memory registry is the runtime authority; when persistence is
//! enabled, committed subscribers and requirements are also written
//! through to PostgreSQL for durability and external reporting. The
//! schema mirrors the (event, identity number) uniqueness invariant with
//! a unique index, and unique violations are remapped to the same
//! duplicate error the registry surfaces.

pub mod models;
pub mod postgres;

pub use postgres::PostgresArchive;
