use std::env;

use crate::DEFAULT_HISTORY_LIMIT;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
    /// Evaluations kept per rule; older ones are dropped.
    pub history_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            body_limit: 64 * 1024,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Build config from `RULESMITH_*` environment variables (call
    /// [`load_dotenv()`] first). Unset or unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_opt("RULESMITH_HOST").unwrap_or(defaults.host),
            port: env_parse_or("RULESMITH_PORT", defaults.port),
            body_limit: env_parse_or("RULESMITH_BODY_LIMIT", defaults.body_limit),
            history_limit: env_parse_or("RULESMITH_HISTORY_LIMIT", defaults.history_limit),
        }
    }

    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
