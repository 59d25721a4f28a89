//! Contracts for collaborators that live outside this core.
//!
//! The transport, autodiscovery and retry logic are implemented elsewhere.
//! This module only fixes the shapes the schema engine and its callers agree
//! on: how an endpoint and server version are discovered, and the opaque
//! retry policy object that gets passed down to the transport.

use crate::{Build, Error, Result, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Login credentials handed to autodiscovery and the transport.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Result of a successful autodiscovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub endpoint: String,
    pub version: Version,
}

/// Resolves the service endpoint and server version for a mailbox.
///
/// Redirect handling, DNS fallback and caching are the implementor's concern.
pub trait Autodiscover: Send + Sync {
    fn discover(&self, email: &str, credentials: &Credentials) -> Result<Discovery>;
}

/// Opaque retry policy passed down to the transport.
///
/// The schema engine never retries anything itself; it only carries the
/// policy so that callers configure it in one place.
pub trait RetryPolicy: Send + Sync + fmt::Debug {
    /// True if failures should surface immediately.
    fn fail_fast(&self) -> bool;

    /// Upper bound on the total time spent retrying one request.
    fn max_wait(&self) -> Option<Duration> {
        None
    }
}

/// Surface every failure immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailFast;

impl RetryPolicy for FailFast {
    fn fail_fast(&self) -> bool {
        true
    }
}

/// Retry throttled or unavailable servers for up to `max_wait`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultTolerance {
    pub max_wait: Duration,
}

impl Default for FaultTolerance {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(default_max_wait_secs()),
        }
    }
}

impl RetryPolicy for FaultTolerance {
    fn fail_fast(&self) -> bool {
        false
    }

    fn max_wait(&self) -> Option<Duration> {
        Some(self.max_wait)
    }
}

/// Everything the transport needs to talk to one server.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    pub endpoint: String,
    pub version: Version,
    pub retry_policy: Arc<dyn RetryPolicy>,
}

impl ProtocolConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, version: Version, retry_policy: Arc<dyn RetryPolicy>) -> Self {
        Self {
            endpoint: endpoint.into(),
            version,
            retry_policy,
        }
    }

    /// Builds a config from an autodiscovery lookup.
    pub fn discover(
        discoverer: &dyn Autodiscover,
        email: &str,
        credentials: &Credentials,
        retry_policy: Arc<dyn RetryPolicy>,
    ) -> Result<Self> {
        let Discovery { endpoint, version } = discoverer.discover(email, credentials)?;
        info!(%email, %endpoint, %version, "Autodiscovered service endpoint");
        Ok(Self::new(endpoint, version, retry_policy))
    }

    /// Parses a config file such as:
    ///
    /// ```toml
    /// endpoint = "https://mail.example.com/EWS/Exchange.asmx"
    /// version = "Exchange2013_SP1"   # or a build number like "15.0.847.32"
    ///
    /// [retry]
    /// fail_fast = false
    /// max_wait_secs = 600
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ProtocolFile = toml::from_str(contents)?;
        file.into_config()
    }
}

/// On-disk form of [`ProtocolConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProtocolFile {
    endpoint: String,
    version: String,
    #[serde(default)]
    retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetryConfig {
    #[serde(default = "default_fail_fast")]
    fail_fast: bool,
    #[serde(default = "default_max_wait_secs")]
    max_wait_secs: u64,
}

const fn default_fail_fast() -> bool {
    true
}

const fn default_max_wait_secs() -> u64 {
    3600
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            fail_fast: default_fail_fast(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl ProtocolFile {
    fn into_config(self) -> Result<ProtocolConfig> {
        let version = match Version::from_api_version(&self.version) {
            Ok(version) => version,
            Err(Error::UnknownApiVersion(_)) => Version::from_build(self.version.parse::<Build>()?),
            Err(e) => return Err(e),
        };
        let retry_policy: Arc<dyn RetryPolicy> = if self.retry.fail_fast {
            Arc::new(FailFast)
        } else {
            Arc::new(FaultTolerance {
                max_wait: Duration::from_secs(self.retry.max_wait_secs),
            })
        };
        debug!(endpoint = %self.endpoint, %version, "Loaded protocol config");
        Ok(ProtocolConfig::new(self.endpoint, version, retry_policy))
    }
}
