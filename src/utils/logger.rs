//! Logger setup for the signing tools
//! Created: 2025-06-05

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set.
#[derive(Debug, Clone)]
pub struct Logger {
    level: String,
    initialized: bool,
}

impl Logger {
    pub fn new() -> Self {
        Self::with_level("info")
    }

    pub fn with_level(level: &str) -> Self {
        Self {
            level: level.to_string(),
            initialized: false,
        }
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    /// Directive used when `RUST_LOG` is absent.
    pub fn default_directive(&self) -> String {
        format!("pdfsign={}", self.level)
    }

    /// Returns `false` when another subscriber was already installed,
    /// which happens in tests that share a process.
    pub fn init(&mut self) -> bool {
        if self.initialized {
            return true;
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()));

        self.initialized = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();

        if self.initialized {
            debug!("Logger initialized with level: {}", self.level);
        }
        self.initialized
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
