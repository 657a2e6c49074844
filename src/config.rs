//! Client configuration: account location, credentials and transport timeout.

use std::time::Duration;

use reqwest::Url;

use crate::{Result, ZendeskApiError};

pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HOSTNAME: &str = "zendesk.com";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const API_VERSION: &str = "v2";

/// Credentials attached to every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Basic auth with the account password.
    Password { username: String, password: String },
    /// Basic auth as `{username}/token` with an API token.
    Token { username: String, token: String },
    /// Bearer token from an OAuth grant.
    OAuth { token: String },
}

impl Auth {
    pub fn password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn token(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Token {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn oauth(token: impl Into<String>) -> Self {
        Self::OAuth {
            token: token.into(),
        }
    }
}

/// Where the account lives and how to reach it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub subdomain: String,
    pub hostname: String,
    pub scheme: String,
    pub port: u16,
    pub auth: Auth,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for `https://{subdomain}.zendesk.com`.
    pub fn new(subdomain: impl Into<String>, auth: Auth) -> Self {
        Self {
            subdomain: subdomain.into(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            port: DEFAULT_PORT,
            auth,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from the process environment.
    ///
    /// Reads `ZENDESK_SUBDOMAIN` and `ZENDESK_USERNAME`, one of
    /// `ZENDESK_TOKEN`, `ZENDESK_PASSWORD` or `ZENDESK_OAUTH_TOKEN`, and the
    /// optional `ZENDESK_HOSTNAME`, `ZENDESK_SCHEME`, `ZENDESK_PORT` and
    /// `ZENDESK_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| ZendeskApiError::Config(format!("{key} is not set")))
        };

        let subdomain = require("ZENDESK_SUBDOMAIN")?;
        // Token auth takes precedence over password, OAuth needs no username.
        let auth = if let Some(token) = get("ZENDESK_TOKEN") {
            Auth::token(require("ZENDESK_USERNAME")?, token)
        } else if let Some(password) = get("ZENDESK_PASSWORD") {
            Auth::password(require("ZENDESK_USERNAME")?, password)
        } else if let Some(token) = get("ZENDESK_OAUTH_TOKEN") {
            Auth::oauth(token)
        } else {
            return Err(ZendeskApiError::Config(
                "one of ZENDESK_TOKEN, ZENDESK_PASSWORD or ZENDESK_OAUTH_TOKEN must be set".into(),
            ));
        };

        let mut config = Self::new(subdomain, auth);
        if let Some(hostname) = get("ZENDESK_HOSTNAME") {
            config.hostname = hostname;
        }
        if let Some(scheme) = get("ZENDESK_SCHEME") {
            config.scheme = scheme;
        }
        if let Some(port) = get("ZENDESK_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ZendeskApiError::Config(format!("invalid ZENDESK_PORT: {port}")))?;
        }
        if let Some(secs) = get("ZENDESK_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ZendeskApiError::Config(format!("invalid ZENDESK_TIMEOUT_SECS: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Base URL every endpoint is joined onto, e.g.
    /// `https://acme.zendesk.com/api/v2/`.
    pub fn api_url(&self) -> Result<Url> {
        if self.subdomain.trim().is_empty() {
            return Err(ZendeskApiError::Config("subdomain is empty".into()));
        }
        if self.scheme != "https" && self.scheme != "http" {
            return Err(ZendeskApiError::Config(format!(
                "unsupported scheme: {}",
                self.scheme
            )));
        }
        let raw = format!(
            "{}://{}.{}:{}/api/{}/",
            self.scheme, self.subdomain, self.hostname, self.port, API_VERSION
        );
        Url::parse(&raw).map_err(|e| ZendeskApiError::Config(format!("invalid api url {raw}: {e}")))
    }
}
