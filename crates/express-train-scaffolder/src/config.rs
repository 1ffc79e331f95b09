//! Generator configuration
//!
//! Everything the generator needs to know about the target framework and the
//! registry it is published to lives here, so the binary only has to build a
//! `GeneratorConfig` and hand it down.

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Default npm registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Environment variable overriding the registry base URL
pub const REGISTRY_URL_ENV: &str = "EXPRESS_TRAIN_REGISTRY_URL";

/// Upper bound on the latest-version lookup
const DEFAULT_REGISTRY_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport settings for the registry client only.
///
/// `accept_invalid_certs` turns off TLS certificate verification for the
/// single latest-version lookup. This exposes that request to interception:
/// a man-in-the-middle could feed a bogus suggested default. The worst outcome
/// is a wrong pre-filled prompt value, which the user still confirms. It is
/// applied to one `reqwest::Client` and never to the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: true,
            timeout: DEFAULT_REGISTRY_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Transport with certificate verification left on
    pub fn strict() -> Self {
        Self {
            accept_invalid_certs: false,
            ..Self::default()
        }
    }
}

/// Identity of the generated framework and where to look it up
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// npm package name of the framework
    pub package_name: String,

    /// Human-readable name for prompts and banners
    pub display_name: String,

    /// Registry base URL (`{registry}/{package}/latest` is queried)
    pub registry_url: String,

    pub transport: TransportConfig,

    /// Framework documentation shown in the closing message
    pub docs_url: String,

    /// User agent string for HTTP requests
    pub user_agent: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package_name: "express-train".to_string(),
            display_name: "Express Train".to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            transport: TransportConfig::default(),
            docs_url: "https://github.com/autoric/express-train".to_string(),
            user_agent: concat!("express-train-create/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Default configuration with `EXPRESS_TRAIN_REGISTRY_URL` applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url_str) = std::env::var(REGISTRY_URL_ENV) {
            config.registry_url = url_str;
        }
        config.registry_base()?;
        Ok(config)
    }

    /// Parsed registry base URL
    pub fn registry_base(&self) -> Result<Url> {
        Url::parse(&self.registry_url)
            .with_context(|| format!("Invalid registry URL: {}", self.registry_url))
    }

    pub fn with_transport(mut self, transport: TransportConfig) -> Self {
        self.transport = transport;
        self
    }
}
