//! Client configuration

use std::time::Duration;

/// Production API origin
pub const DEFAULT_ENDPOINT: &str = "https://api.openload.co";

/// Account credentials attached to every outbound request
#[derive(Clone, Debug)]
pub struct Credentials {
    login: String,
    key: String,
}

impl Credentials {
    /// Create credentials from the account's API login and key
    pub fn new(login: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            key: key.into(),
        }
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// API origin, without a trailing slash
    pub endpoint: String,
    /// Version segment prefixed to every API path
    pub api_version: u32,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: 1,
            timeout: Duration::from_secs(30),
            user_agent: format!("openload-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Create a new config pointed at the given origin
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the API version segment
    pub fn with_api_version(mut self, version: u32) -> Self {
        self.api_version = version;
        self
    }

    /// The `/1`-style prefix applied to every API path
    pub fn location_prefix(&self) -> String {
        format!("/{}", self.api_version)
    }
}
