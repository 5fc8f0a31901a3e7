//! services/api/src/config.rs
//!
//! Defines the service's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use crate::adapters::MAX_LATENCY_SCALE;
use pdf_reader_core::library::DeletePolicy;
use pdf_reader_core::session::ZoomSettings;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Multiplier for simulated backend delays; 0 turns them off.
    pub latency_scale: f64,
    /// Seed for every simulated random choice. Unset means a fresh seed per run.
    pub rng_seed: Option<u64>,
    /// How long after an import the background OCR run starts.
    pub ocr_delay: Duration,
    pub search_limit: usize,
    pub zoom: ZoomSettings,
    pub delete_policy: DeletePolicy,
    pub seed_demo_data: bool,
    /// Sessions untouched for this long are dropped when a new one opens.
    pub session_idle_ttl: Duration,
    /// Most open sessions; opening past it evicts the least recently used.
    pub max_sessions: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_level: Level::INFO,
            latency_scale: 1.0,
            rng_seed: None,
            ocr_delay: Duration::from_millis(3000),
            search_limit: 8,
            zoom: ZoomSettings::default(),
            delete_policy: DeletePolicy::default(),
            seed_demo_data: true,
            session_idle_ttl: Duration::from_secs(30 * 60),
            max_sessions: 1024,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Server and Logging ---
        let bind_address = parsed(&lookup, "BIND_ADDRESS", defaults.bind_address)?;
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Simulation ---
        let latency_scale: f64 = parsed(&lookup, "LATENCY_SCALE", defaults.latency_scale)?;
        if !(0.0..=MAX_LATENCY_SCALE).contains(&latency_scale) {
            return Err(ConfigError::InvalidValue(
                "LATENCY_SCALE".to_string(),
                format!("must be between 0 and {}", MAX_LATENCY_SCALE),
            ));
        }
        let rng_seed = match lookup("RNG_SEED") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue("RNG_SEED".to_string(), e.to_string())
            })?),
            None => None,
        };
        let ocr_delay_ms: u64 =
            parsed(&lookup, "OCR_DELAY_MS", defaults.ocr_delay.as_millis() as u64)?;
        let seed_demo_data = parsed(&lookup, "SEED_DEMO_DATA", defaults.seed_demo_data)?;

        // --- Reader Behaviour ---
        let search_limit: usize = parsed(&lookup, "SEARCH_LIMIT", defaults.search_limit)?;
        if search_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "SEARCH_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let zoom = ZoomSettings {
            min: parsed(&lookup, "ZOOM_MIN", defaults.zoom.min)?,
            max: parsed(&lookup, "ZOOM_MAX", defaults.zoom.max)?,
            fit_width: parsed(&lookup, "ZOOM_FIT_WIDTH", defaults.zoom.fit_width)?,
            fit_page: parsed(&lookup, "ZOOM_FIT_PAGE", defaults.zoom.fit_page)?,
        };
        if !(zoom.min > 0.0 && zoom.min <= zoom.max) {
            return Err(ConfigError::InvalidValue(
                "ZOOM_MIN".to_string(),
                format!("expected 0 < ZOOM_MIN <= ZOOM_MAX, got {} / {}", zoom.min, zoom.max),
            ));
        }
        let delete_policy = parsed(&lookup, "DELETE_POLICY", defaults.delete_policy)?;

        // --- Sessions ---
        let session_idle_ttl_secs: u64 = parsed(
            &lookup,
            "SESSION_IDLE_TTL_SECS",
            defaults.session_idle_ttl.as_secs(),
        )?;
        let max_sessions: usize = parsed(&lookup, "MAX_SESSIONS", defaults.max_sessions)?;
        if max_sessions == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_SESSIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            latency_scale,
            rng_seed,
            ocr_delay: Duration::from_millis(ocr_delay_ms),
            search_limit,
            zoom,
            delete_policy,
            seed_demo_data,
            session_idle_ttl: Duration::from_secs(session_idle_ttl_secs),
            max_sessions,
        })
    }
}

/// Parses `key` when present, falling back to `default` when it is not.
fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address.port(), 3000);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.search_limit, 8);
        assert_eq!(config.zoom, ZoomSettings::default());
        assert_eq!(config.delete_policy, DeletePolicy::Cascade);
        assert_eq!(config.ocr_delay, Duration::from_millis(3000));
        assert!(config.rng_seed.is_none());
        assert!(config.seed_demo_data);
        assert_eq!(config.session_idle_ttl, Duration::from_secs(1800));
        assert_eq!(config.max_sessions, 1024);
    }

    #[test]
    fn values_are_parsed() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("RUST_LOG", "debug"),
            ("LATENCY_SCALE", "0"),
            ("RNG_SEED", "99"),
            ("SEARCH_LIMIT", "3"),
            ("ZOOM_MAX", "4"),
            ("DELETE_POLICY", "reject"),
            ("SEED_DEMO_DATA", "false"),
            ("SESSION_IDLE_TTL_SECS", "60"),
            ("MAX_SESSIONS", "5"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.latency_scale, 0.0);
        assert_eq!(config.rng_seed, Some(99));
        assert_eq!(config.search_limit, 3);
        assert_eq!(config.zoom.max, 4.0);
        assert_eq!(config.delete_policy, DeletePolicy::Reject);
        assert!(!config.seed_demo_data);
        assert_eq!(config.session_idle_ttl, Duration::from_secs(60));
        assert_eq!(config.max_sessions, 5);
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = load(&[("SEARCH_LIMIT", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "SEARCH_LIMIT"));

        let err = load(&[("LATENCY_SCALE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "LATENCY_SCALE"));

        let err = load(&[("LATENCY_SCALE", "1e300")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "LATENCY_SCALE"));

        let err = load(&[("LATENCY_SCALE", "NaN")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "LATENCY_SCALE"));

        let err = load(&[("ZOOM_MIN", "5"), ("ZOOM_MAX", "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "ZOOM_MIN"));

        let err = load(&[("MAX_SESSIONS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "MAX_SESSIONS"));

        let err = load(&[("DELETE_POLICY", "purge")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key, _) if key == "DELETE_POLICY"));
    }
}
