/*
[INPUT]:  Caller overrides, process environment (NH_*), built-in defaults
[OUTPUT]: Immutable ClientConfig resolved once per client
[POS]:    Configuration layer - precedence: explicit > environment > default
[UPDATE]: When adding configuration options or environment keys
*/

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::{NicehashError, Result};

/// Sandbox API host
pub const SANDBOX_HOST: &str = "api-test.nicehash.com";
/// Production API host
pub const PRODUCTION_HOST: &str = "api2.nicehash.com";
pub const DEFAULT_LOCALE: &str = "en";

pub const ENV_SANDBOX: &str = "NH_SANDBOX";
pub const ENV_LOCALE: &str = "NH_LOCALE";
pub const ENV_KEY: &str = "NH_KEY";
pub const ENV_SECRET: &str = "NH_SECRET";
pub const ENV_ORG_ID: &str = "NH_ORG_ID";

/// Resolved client configuration.
///
/// Built once through [`ConfigOverrides::resolve`] and never mutated.
/// When `sandbox` is false the host is always [`PRODUCTION_HOST`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    sandbox: bool,
    host: String,
    locale: String,
    api_key: Option<String>,
    api_secret: Option<String>,
    organization_id: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn sandbox(&self) -> bool {
        self.sandbox
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// Request timeout; `None` means requests may wait indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// HTTPS base URL for the configured host
    pub fn base_url(&self) -> Result<Url> {
        Ok(Url::parse(&format!("https://{}", self.host))?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ConfigOverrides::default().resolve_with(|_| None)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("sandbox", &self.sandbox)
            .field("host", &self.host)
            .field("locale", &self.locale)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("organization_id", &self.organization_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Caller-supplied configuration values; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub sandbox: Option<bool>,
    pub host: Option<String>,
    pub locale: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub organization_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Load overrides from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NicehashError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            NicehashError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = Some(sandbox);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_credentials(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self.api_secret = Some(secret.into());
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Layer `higher` on top of `self`; fields set in `higher` win
    pub fn overlay(self, higher: ConfigOverrides) -> Self {
        Self {
            sandbox: higher.sandbox.or(self.sandbox),
            host: higher.host.or(self.host),
            locale: higher.locale.or(self.locale),
            api_key: higher.api_key.or(self.api_key),
            api_secret: higher.api_secret.or(self.api_secret),
            organization_id: higher.organization_id.or(self.organization_id),
            timeout_secs: higher.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Resolve against the process environment
    pub fn resolve(self) -> ClientConfig {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve against an arbitrary environment lookup
    pub fn resolve_with<F>(self, env: F) -> ClientConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).filter(|value| !value.is_empty());
        let non_empty = |value: Option<String>| value.filter(|value| !value.is_empty());

        let sandbox = self
            .sandbox
            .or_else(|| lookup(ENV_SANDBOX).map(|value| parse_flag(&value)))
            .unwrap_or(true);

        let host = if sandbox {
            non_empty(self.host).unwrap_or_else(|| SANDBOX_HOST.to_string())
        } else {
            PRODUCTION_HOST.to_string()
        };

        ClientConfig {
            sandbox,
            host,
            locale: non_empty(self.locale)
                .or_else(|| lookup(ENV_LOCALE))
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            api_key: non_empty(self.api_key).or_else(|| lookup(ENV_KEY)),
            api_secret: non_empty(self.api_secret).or_else(|| lookup(ENV_SECRET)),
            organization_id: non_empty(self.organization_id)
                .or_else(|| lookup(ENV_ORG_ID))
                .unwrap_or_default(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no"
    )
}
