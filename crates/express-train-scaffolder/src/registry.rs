//! Latest-version lookup against the npm registry
//!
//! The lookup only feeds the suggested default of the version prompt, so any
//! failure degrades to "no default" instead of an error.

use crate::config::{GeneratorConfig, TransportConfig};
use crate::error::{Result, ScaffoldError};
use crate::version::truncate_to_minor;
use serde::Deserialize;
use url::Url;

/// Source of the latest published version of a package
#[allow(async_fn_in_trait)]
pub trait RegistryClient {
    async fn latest_version(&self, package: &str) -> Result<String>;
}

/// Body of `GET {registry}/{package}/latest`
#[derive(Debug, Deserialize)]
struct LatestManifest {
    version: String,
}

/// Registry client over HTTP(S)
pub struct HttpRegistry {
    base: Url,
    client: reqwest::Client,
}

impl HttpRegistry {
    /// Build a client whose TLS and timeout settings come from `transport` only
    pub fn new(base: Url, transport: &TransportConfig, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(transport.timeout)
            .danger_accept_invalid_certs(transport.accept_invalid_certs)
            .build()
            .map_err(|e| ScaffoldError::RegistryUnavailable(e.to_string()))?;
        Ok(Self { base, client })
    }

    pub fn from_config(config: &GeneratorConfig) -> anyhow::Result<Self> {
        let base = config.registry_base()?;
        Ok(Self::new(base, &config.transport, &config.user_agent)?)
    }

    /// `{base}/{package}/latest`, preserving any path prefix on the base
    fn latest_url(&self, package: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScaffoldError::RegistryUnavailable(format!(
                    "URL cannot have path segments: {}",
                    self.base
                ))
            })?
            .pop_if_empty()
            .push(package)
            .push("latest");
        Ok(url)
    }
}

impl RegistryClient for HttpRegistry {
    async fn latest_version(&self, package: &str) -> Result<String> {
        let url = self.latest_url(package)?;
        tracing::debug!(%url, "fetching latest version");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScaffoldError::RegistryUnavailable(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::RegistryUnavailable(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        let manifest: LatestManifest = response
            .json()
            .await
            .map_err(|e| ScaffoldError::RegistryUnavailable(format!("{}: {}", url, e)))?;
        Ok(manifest.version)
    }
}

/// Suggested default range (`2.3.7` -> `2.3.x`), or `None` when offline
pub async fn resolve_default_range<R: RegistryClient>(registry: &R, package: &str) -> Option<String> {
    match registry.latest_version(package).await {
        Ok(latest) => {
            let default = truncate_to_minor(&latest);
            if default.is_none() {
                tracing::debug!(%latest, "registry returned a malformed version");
            }
            default
        }
        Err(e) => {
            tracing::debug!(error = %e, "no default version available");
            None
        }
    }
}

/// Suggested default for the configured registry and package.
///
/// A client that cannot be built counts as an offline registry.
pub async fn suggested_default(config: &GeneratorConfig) -> Option<String> {
    match HttpRegistry::from_config(config) {
        Ok(registry) => resolve_default_range(&registry, &config.package_name).await,
        Err(e) => {
            tracing::debug!(error = %e, "registry client unavailable");
            None
        }
    }
}
