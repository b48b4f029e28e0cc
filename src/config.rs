//! Client configuration parsed from environment variables.
//!
//! The browser build normally sticks with the same-origin default; native
//! callers point `DRAFTFORGE_API_BASE` at an absolute origin.

pub const DEFAULT_API_BASE: &str = "/api/v1";
pub const API_BASE_ENV: &str = "DRAFTFORGE_API_BASE";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    EmptyBasePath { var: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix joined in front of every request path, without a trailing `/`.
    pub base_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { base_path: DEFAULT_API_BASE.to_owned() }
    }
}

impl ClientConfig {
    /// Build a config for an explicit base path.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self { base_path: normalize_base(&base_path.into()) }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `DRAFTFORGE_API_BASE`: default `/api/v1`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBasePath`] when the variable is set but
    /// empty (or only slashes).
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(API_BASE_ENV) {
            Ok(raw) => parse_base_path(&raw).map(|base_path| Self { base_path }),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Full URL for `path` under the configured base.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_path)
    }
}

fn parse_base_path(raw: &str) -> Result<String, ConfigError> {
    let base = normalize_base(raw);
    if base.is_empty() {
        return Err(ConfigError::EmptyBasePath { var: API_BASE_ENV.to_owned() });
    }
    Ok(base)
}

fn normalize_base(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
