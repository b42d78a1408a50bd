//! FCM client configuration.

use std::fmt;
use std::time::Duration;

use crate::{FcmError, Result};

/// Default endpoint of the legacy send API.
pub const DEFAULT_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Default endpoint of the Instance ID lookup API. `{token}` is replaced
/// with the token being inspected.
pub const DEFAULT_LOOKUP_URL: &str = "https://iid.googleapis.com/iid/info/{token}?details=true";

const ENV_API_KEY: &str = "FCM_API_KEY";
const ENV_SEND_URL: &str = "FCM_SEND_URL";
const ENV_LOOKUP_URL: &str = "FCM_LOOKUP_URL";
const ENV_CONNECT_TIMEOUT: &str = "FCM_CONNECT_TIMEOUT_SECS";
const ENV_TIMEOUT: &str = "FCM_TIMEOUT_SECS";

/// FCM client configuration.
#[derive(Clone)]
pub struct FcmConfig {
    /// Server key sent as `Authorization: key=<api_key>`.
    pub api_key: String,
    /// Send endpoint.
    pub send_url: String,
    /// Token lookup endpoint.
    pub lookup_url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// TCP keep-alive interval.
    pub tcp_keepalive: Duration,
    /// Ceiling for a whole request, headers and body included.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl FcmConfig {
    /// Create a configuration with default endpoints and timeouts.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            send_url: DEFAULT_SEND_URL.to_string(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            tcp_keepalive: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
            user_agent: format!("pushwire-fcm/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create a new configuration builder.
    pub fn builder(api_key: impl Into<String>) -> FcmConfigBuilder {
        FcmConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// Load configuration from process environment variables.
    ///
    /// `FCM_API_KEY` is required. `FCM_SEND_URL`, `FCM_LOOKUP_URL`,
    /// `FCM_CONNECT_TIMEOUT_SECS` and `FCM_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a `.env` file (the nearest one when `path` is `None`), then read
    /// the environment as [`FcmConfig::from_env`] does.
    pub fn from_dotenv(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            dotenvy::from_path(path).map_err(|e| FcmError::Config(e.to_string()))?;
        } else {
            dotenvy::dotenv().ok(); // Ignore if .env doesn't exist
        }
        Self::from_env()
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| FcmError::Config(format!("{ENV_API_KEY} is not set")))?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup(ENV_SEND_URL).filter(|u| !u.is_empty()) {
            config.send_url = url;
        }
        if let Some(url) = lookup(ENV_LOOKUP_URL).filter(|u| !u.is_empty()) {
            config.lookup_url = url;
        }
        if let Some(secs) = lookup(ENV_CONNECT_TIMEOUT).and_then(|s| s.parse().ok()) {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup(ENV_TIMEOUT).and_then(|s| s.parse().ok()) {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Build the default transport with this configuration's timeouts.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .tcp_keepalive(self.tcp_keepalive)
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}

impl fmt::Debug for FcmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FcmConfig")
            .field("api_key", &"<redacted>")
            .field("send_url", &self.send_url)
            .field("lookup_url", &self.lookup_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("tcp_keepalive", &self.tcp_keepalive)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for FCM client configuration.
#[derive(Debug)]
pub struct FcmConfigBuilder {
    config: FcmConfig,
}

impl FcmConfigBuilder {
    /// Set the send endpoint.
    pub fn send_url(mut self, url: impl Into<String>) -> Self {
        self.config.send_url = url.into();
        self
    }

    /// Set the token lookup endpoint.
    pub fn lookup_url(mut self, url: impl Into<String>) -> Self {
        self.config.lookup_url = url.into();
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the TCP keep-alive interval.
    pub fn tcp_keepalive(mut self, interval: Duration) -> Self {
        self.config.tcp_keepalive = interval;
        self
    }

    /// Set the whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FcmConfig {
        self.config
    }
}
