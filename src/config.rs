//! Settings layered over a TOML file and environment overrides (spec §6
//! "Environment variables" and SPEC_FULL.md §6 "Added: environment/config
//! surface"), following the upstream pattern of a `Config::load` entry point
//! over the `config` crate.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    #[serde(default = "default_detector_base_url")]
    pub detector_base_url: String,

    #[serde(default = "default_ingest_concurrency")]
    pub ingest_concurrency: usize,

    #[serde(default = "default_search_concurrency")]
    pub search_concurrency: usize,

    #[serde(default = "default_search_rate")]
    pub search_rate: f64,

    #[serde(default = "default_rebuild_period_secs")]
    pub rebuild_period_secs: u64,

    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_bind_addr() -> String { "0.0.0.0:8080".to_string() }
fn default_database_url() -> String { "postgres://localhost/corpus".to_string() }
fn default_upstream_base_url() -> String { "https://xkcd.com".to_string() }
fn default_detector_base_url() -> String { "http://localhost:9090".to_string() }
fn default_ingest_concurrency() -> usize { 8 }
fn default_search_concurrency() -> usize { 16 }
fn default_search_rate() -> f64 { 10.0 }
fn default_rebuild_period_secs() -> u64 { 20 }
fn default_token_ttl_secs() -> u64 { 120 }
fn default_upstream_timeout_secs() -> u64 { 10 }

impl Settings {
    /// Loads `config.toml` (if present, relative to `config_path`) layered
    /// under environment variables prefixed `CORPUS_` (e.g.
    /// `CORPUS_BIND_ADDR`), falling back to hardcoded defaults for anything
    /// neither source sets. `ADMIN_USER`/`ADMIN_PASSWORD` are deliberately
    /// not part of this struct — they are read straight from the
    /// environment by `corpus_gateway::auth::AuthService::from_env`, never
    /// from a config file (spec §6).
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CORPUS").try_parsing(true).separator("_"),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn rebuild_period(&self) -> Duration {
        Duration::from_secs(self.rebuild_period_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
