//! corpus-core — shared types, error taxonomy, and port traits for the comic
//! corpus services.
//!
//! This crate exposes the seams between the four architectural layers as
//! trait objects so that `corpus-ingestor`, `corpus-search`, and
//! `corpus-gateway` can be composed in-process without depending on each
//! other directly.
//!
//! # Architecture
//!
//! ```text
//! Normalizer ──► Ingestor ──┐
//!                           ├──► Storage ──► Search Engine ──► Gateway
//! Normalizer ──► Search Engine ┘
//! ```
//!
//! `corpus-storage` is shared read/write by the Ingestor (writer) and the
//! Search Engine (reader); neither depends on the other.

pub mod error;
pub mod ports;
pub mod types;

pub use error::CoreError;
pub use types::{Comic, DbStats, SearchResult, ServiceStats, ServiceStatus};
