//! corpus-search — dual-mode ranked retrieval (spec §4.3).
//!
//! `search` is storage-backed (the ranking runs as a single SQL query in
//! `corpus-storage`); `index_search` walks an in-memory inverted index and
//! ranks candidates locally with [`ranking::rank`]. Both apply the identical
//! two-key rule: distinct keyword matches first, total keyword multiplicity
//! second.

pub mod index;
pub mod ranking;
pub mod service;

pub use index::Index;
pub use service::SearchService;
