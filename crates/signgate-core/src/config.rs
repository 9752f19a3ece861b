//! Gateway configuration.
//!
//! Provides [`GateConfig`], loaded from environment variables via
//! [`GateConfig::from_env`]. The shared signing secret lives here and is passed
//! explicitly into the HTTP layer; nothing reads the environment after startup.

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Default bind address.
pub const DEFAULT_GATEWAY_LISTEN: &str = "0.0.0.0:8787";

/// Default root directory for the filesystem object store.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Gateway configuration.
///
/// # Examples
///
/// ```
/// use signgate_core::config::GateConfig;
///
/// let config = GateConfig::builder()
///     .signature_secret("s3cr3t".into())
///     .build();
/// assert_eq!(config.gateway_listen, "0.0.0.0:8787");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// Bind address for the gateway (e.g. `"0.0.0.0:8787"`).
    #[builder(default = String::from(DEFAULT_GATEWAY_LISTEN))]
    pub gateway_listen: String,

    /// Shared HMAC secret used to verify signed URLs.
    #[builder(default)]
    #[serde(default, skip_serializing)]
    pub signature_secret: String,

    /// Origin (`scheme://host[:port]`) used in canonical messages instead of
    /// the one derived from the request. Set this when running behind a proxy.
    #[builder(default)]
    pub public_origin: Option<String>,

    /// Root directory served by the filesystem object store.
    #[builder(default = String::from(DEFAULT_DATA_DIR))]
    pub data_dir: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("signature_secret", &"<redacted>")
            .field("public_origin", &self.public_origin)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from(DEFAULT_GATEWAY_LISTEN),
            signature_secret: String::new(),
            public_origin: None,
            data_dir: String::from(DEFAULT_DATA_DIR),
            log_level: String::from("info"),
        }
    }
}

impl GateConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:8787` |
    /// | `SIGNATURE_SECRET` | *(empty)* |
    /// | `SIGNGATE_PUBLIC_ORIGIN` | *(unset)* |
    /// | `DATA_DIR` | `./data` |
    /// | `LOG_LEVEL` | `info` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("SIGNATURE_SECRET") {
            config.signature_secret = v;
        }
        if let Some(v) = lookup("SIGNGATE_PUBLIC_ORIGIN") {
            if !v.is_empty() {
                config.public_origin = Some(v);
            }
        }
        if let Some(v) = lookup("DATA_DIR") {
            config.data_dir = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// Check that the configuration can serve requests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signature_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        self.listen_addr()?;
        if let Some(origin) = &self.public_origin {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ConfigError::InvalidOrigin(origin.clone()));
            }
        }
        Ok(())
    }

    /// Parse [`gateway_listen`](Self::gateway_listen) as a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.gateway_listen
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.gateway_listen.clone()))
    }
}
