use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tours_query::{TranslateOptions, parse_sort};

pub const ENV_VAR: &str = "TOURS_ENV";
pub const PAGE_SIZE_VAR: &str = "TOURS_PAGE_SIZE";
pub const DEFAULT_SORT_VAR: &str = "TOURS_DEFAULT_SORT";

/// Controls how much error detail responses expose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToursConfig {
    pub environment: Environment,
    pub query: TranslateOptions,
}

impl ToursConfig {
    /// Read overrides from `TOURS_ENV`, `TOURS_PAGE_SIZE` and `TOURS_DEFAULT_SORT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ToursConfig::from_env`] with a custom variable source.
    /// Invalid values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ToursConfig::default();

        if let Some(raw) = lookup(ENV_VAR) {
            match raw.parse() {
                Ok(environment) => config.environment = environment,
                Err(e) => tracing::warn!(var = ENV_VAR, %raw, "ignoring {e}"),
            }
        }

        if let Some(raw) = lookup(PAGE_SIZE_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.query.default_limit = n,
                _ => tracing::warn!(var = PAGE_SIZE_VAR, %raw, "ignoring invalid page size"),
            }
        }

        if let Some(raw) = lookup(DEFAULT_SORT_VAR) {
            if parse_sort(&raw).is_empty() {
                tracing::warn!(var = DEFAULT_SORT_VAR, %raw, "ignoring empty sort");
            } else {
                config.query.default_sort = raw;
            }
        }

        config
    }
}
