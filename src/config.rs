//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has a `Default` matching the shipped tuning, so the
//! engine (and tests) can run without a config file. Secrets are
//! referenced by env-var name and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub roi: RoiParams,
    pub test_mode: TestModeParams,
    pub cache: CacheConfig,
    pub monitor: MonitorConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub name: String,
    pub cycle_interval_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "ARGUS-001".to_string(),
            cycle_interval_secs: 30,
        }
    }
}

/// Market-friction parameters consumed by the ROI estimator.
///
/// Held per-engine rather than process-wide so isolated engines can run
/// concurrently with different tunings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RoiParams {
    /// Fee charged on profit (Polymarket standard: 3%).
    pub fee: f64,
    /// Expected price movement per second while reacting.
    pub catchup_speed: f64,
    /// Assumed reaction latency in seconds.
    pub action_time: f64,
    /// Fixed per-share friction cost.
    pub fixed_cost: f64,
}

impl Default for RoiParams {
    fn default() -> Self {
        Self {
            fee: 0.03,
            catchup_speed: 0.8,
            action_time: 0.025,
            fixed_cost: 0.0005,
        }
    }
}

/// Test-mode position-sizing parameters. Plain assignment, no validation.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TestModeParams {
    pub capital: f64,
    pub base_position_pct: f64,
    pub max_position_pct: f64,
    pub min_position_pct: f64,
}

impl Default for TestModeParams {
    fn default() -> Self {
        Self {
            capital: 1.0,
            base_position_pct: 0.025,
            max_position_pct: 0.1,
            min_position_pct: 0.01,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry count at which the ROI cache is wholesale-cleared.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 1000 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MonitorConfig {
    /// HTTP request timeout per endpoint, milliseconds.
    pub request_timeout_ms: u64,
    /// Engine-side hard deadline per poll task, milliseconds.
    /// Covers endpoints whose transport-level timeout misbehaves.
    pub poll_deadline_ms: u64,
    /// Extra endpoints monitored on top of the domain catalog.
    pub extra_endpoints: Vec<String>,
    /// Keywords scanned on every endpoint body.
    pub keywords: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            poll_deadline_ms: 8000,
            extra_endpoints: Vec::new(),
            keywords: vec![
                "federal".to_string(),
                "reserve".to_string(),
                "rate".to_string(),
                "gdp".to_string(),
                "recession".to_string(),
                "crypto".to_string(),
                "bitcoin".to_string(),
                "ethereum".to_string(),
            ],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IngestConfig {
    /// Market listing API base URL.
    pub gamma_url: String,
    /// Maximum markets fetched per cycle.
    pub limit: u32,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            gamma_url: "https://gamma-api.polymarket.com/markets".to_string(),
            limit: 100,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Load `config.toml` if present, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(_) => Self::default(),
        }
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name).map_err(|_| {
            crate::types::EngineError::Config(format!("Environment variable not set: {env_name}"))
                .into()
        })
    }
}
