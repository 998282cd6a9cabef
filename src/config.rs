// src/config.rs
//! Process configuration, fixed at start.
//!
//! Lookup order:
//! 1) $TRENDS_CONFIG_PATH (must exist)
//! 2) config/trends.toml
//! 3) built-in defaults

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analyze::MAX_FORECAST_STEPS;

pub const ENV_CONFIG_PATH: &str = "TRENDS_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/trends.toml";

const MIN_REFRESH_MS: u64 = 100;
pub const MAX_HORIZON: usize = MAX_FORECAST_STEPS;

fn default_keywords() -> Vec<String> {
    vec!["AI".to_string(), "ChatGPT".to_string()]
}
fn default_report_every() -> u64 {
    10
}
fn default_report_horizon() -> usize {
    3
}
fn default_dashboard_horizon() -> usize {
    10
}
fn default_refresh_interval_ms() -> u64 {
    5000
}
fn default_rolling_window() -> usize {
    // 7 days of hourly samples
    168
}
fn default_bind_addr() -> String {
    "0.0.0.0:8050".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    /// Emit a text report on every Nth accepted interest event. 0 disables.
    #[serde(default = "default_report_every")]
    pub report_every: u64,
    #[serde(default = "default_report_horizon")]
    pub report_horizon: usize,
    #[serde(default = "default_dashboard_horizon")]
    pub dashboard_horizon: usize,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// JSON-lines event file; stdin when unset.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            report_every: default_report_every(),
            report_horizon: default_report_horizon(),
            dashboard_horizon: default_dashboard_horizon(),
            refresh_interval_ms: default_refresh_interval_ms(),
            rolling_window: default_rolling_window(),
            bind_addr: default_bind_addr(),
            events_path: None,
        }
    }
}

impl AppConfig {
    /// Parse TOML text and sanitize.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s).context("parsing trends config TOML")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading trends config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Env path, then `config/trends.toml`, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    fn sanitized(mut self) -> Self {
        let mut kws: Vec<String> = Vec::with_capacity(self.keywords.len());
        for k in self.keywords.drain(..) {
            let t = k.trim();
            if !t.is_empty() && !kws.iter().any(|x| x == t) {
                kws.push(t.to_string());
            }
        }
        self.keywords = if kws.is_empty() {
            default_keywords()
        } else {
            kws
        };

        self.refresh_interval_ms = self.refresh_interval_ms.max(MIN_REFRESH_MS);
        self.rolling_window = self.rolling_window.max(1);
        self.report_horizon = self.report_horizon.min(MAX_HORIZON);
        self.dashboard_horizon = self.dashboard_horizon.min(MAX_HORIZON);
        self
    }
}
