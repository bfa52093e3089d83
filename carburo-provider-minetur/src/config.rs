//! Connection settings for the MINETUR service.

use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::warn;

/// Default root of the `PreciosCarburantes` REST API.
pub const DEFAULT_BASE_URL: &str =
    "https://sedeaplicaciones.minetur.gob.es/ServiciosRESTCarburantes/PreciosCarburantes";

const DEFAULT_USER_AGENT: &str = "carburo/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Overrides [`MineturConfig::base_url`].
pub const BASE_URL_VAR: &str = "CARBURO_BASE_URL";
/// Overrides [`MineturConfig::user_agent`].
pub const USER_AGENT_VAR: &str = "CARBURO_USER_AGENT";
/// Overrides [`MineturConfig::timeout`], in whole seconds.
pub const TIMEOUT_VAR: &str = "CARBURO_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where and how to reach the service.
pub struct MineturConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for MineturConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MineturConfig {
    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read overrides through `lookup`; unset or invalid values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_owned();
        }

        if let Some(user_agent) = lookup(USER_AGENT_VAR).filter(|value| !value.trim().is_empty()) {
            config.user_agent = user_agent.trim().to_owned();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {TIMEOUT_VAR}"),
            }
        }

        config
    }

    /// Build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the [`reqwest::Error`] raised when the TLS backend cannot be initialised.
    pub fn client(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(self.timeout)
            .build()
    }
}
