use std::path::PathBuf;

use bookworm_shared::feed::DEFAULT_PAGE_LIMIT;
use bookworm_shared::session::UnauthorizedPolicy;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://bookworm-backend-092v.onrender.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub page_limit: u32,
    pub session_file: PathBuf,
    pub logout_on_unauthorized: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env_or_default("BOOKWORM_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            page_limit: parse_env_u32("BOOKWORM_PAGE_LIMIT", DEFAULT_PAGE_LIMIT)?,
            session_file: optional_env("BOOKWORM_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_session_file),
            logout_on_unauthorized: parse_env_bool("BOOKWORM_LOGOUT_ON_UNAUTHORIZED", false)?,
        })
    }

    /// # Errors
    ///
    /// Returns an error for a zero page limit or a non-HTTP API URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_limit == 0 {
            return Err(ConfigError::InvalidValue {
                name: "BOOKWORM_PAGE_LIMIT".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                name: "BOOKWORM_API_URL".to_string(),
                message: format!("expected an http(s) URL, got {:?}", self.api_url),
            });
        }
        Ok(())
    }

    pub fn unauthorized_policy(&self) -> UnauthorizedPolicy {
        if self.logout_on_unauthorized {
            UnauthorizedPolicy::ClearSession
        } else {
            UnauthorizedPolicy::Surface
        }
    }

    /// Local defaults for tests; callers override what they need.
    pub fn for_testing() -> Self {
        Self {
            api_url: "http://127.0.0.1:0".to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            session_file: PathBuf::from("bookworm-session.json"),
            logout_on_unauthorized: false,
        }
    }
}

fn default_session_file() -> PathBuf {
    match optional_env("HOME") {
        Some(home) => PathBuf::from(home).join(".bookworm").join("session.json"),
        None => PathBuf::from("bookworm-session.json"),
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    optional_env(name).unwrap_or_else(|| default.to_string())
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.trim().parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
