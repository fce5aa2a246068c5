//! Structured logging setup via `tracing`.
//!
//! The library itself only emits events; installing a subscriber is the
//! host application's call. `init_tracing` is provided for binaries and
//! tests that want a sensible default, and is idempotent.

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Filter configuration passed to [`init_tracing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("procgrid::rng".to_string(), LogLevel::Warn),
                ("procgrid::selection".to_string(), LogLevel::Info),
            ],
        }
    }
}

impl TracingConfig {
    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing with default settings (idempotent).
pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Initialize tracing with a custom config (idempotent, first call wins).
/// `RUST_LOG` overrides the config when set.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact();

        // Tolerate a subscriber installed by the host application.
        let _ = subscriber.try_init();
    });
}
