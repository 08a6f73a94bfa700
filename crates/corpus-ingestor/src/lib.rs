//! corpus-ingestor — incremental corpus ingestion (spec §4.2).
//!
//! Pulls comics from the upstream source, normalizes their text, and upserts
//! them into storage. Bounded concurrency, per-item partial-failure
//! handling, and persistent (process-lifetime) knowledge of permanently
//! missing ids are the three properties that make this more than a loop.

pub mod service;
pub mod xkcd;

pub use service::IngestService;
pub use xkcd::XkcdClient;
