//! deSEC DNS Provider

mod convert;
mod domain_index;
mod error;
mod http;
mod normalize;
mod planner;
mod provider;
/// deSEC API request/response types.
pub(crate) mod types;

use std::fmt;
use std::sync::Arc;

use reqwest::Client;

use crate::diff::{Differ, GroupDiffer};
use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;
use crate::traits::WarningSink;
use crate::utils::log_sanitizer::mask_secret;
use crate::utils::warning_sink::LogWarningSink;

use domain_index::DomainIndex;

pub(crate) const PROVIDER_NAME: &str = "desec";
/// deSEC API base URL.
pub(crate) const DESEC_API_BASE: &str = "https://desec.io/api/v1";
/// deSEC rejects TTLs below this value.
pub(crate) const MIN_TTL: u32 = 3600;
/// Name servers every deSEC zone is delegated to.
pub(crate) const DEFAULT_NAMESERVERS: [&str; 2] = ["ns1.desec.io", "ns2.desec.org"];

/// deSEC DNS provider implementation.
///
/// Authenticates with a `Token` header. Cloning is cheap; clones share the HTTP client and
/// the domain index.
///
/// # Construction
///
/// ```rust,no_run
/// use desec_provider::DesecProvider;
///
/// # async fn demo() -> desec_provider::Result<()> {
/// let provider = DesecProvider::builder("your-token")
///     .max_retries(2)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DesecProvider {
    pub(crate) client: Client,
    pub(crate) auth_token: String,
    pub(crate) base_url: String,
    pub(crate) max_retries: u32,
    pub(crate) nameservers: Vec<String>,
    pub(crate) domain_index: DomainIndex,
    pub(crate) warnings: Arc<dyn WarningSink>,
    pub(crate) differ: Arc<dyn Differ>,
}

impl fmt::Debug for DesecProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DesecProvider")
            .field("auth_token", &mask_secret(&self.auth_token))
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .field("nameservers", &self.nameservers)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DesecProvider`].
pub struct DesecProviderBuilder {
    auth_token: String,
    base_url: String,
    max_retries: u32,
    nameservers: Vec<String>,
    warnings: Arc<dyn WarningSink>,
    differ: Arc<dyn Differ>,
}

impl DesecProviderBuilder {
    fn new(auth_token: String) -> Self {
        Self {
            auth_token,
            base_url: DESEC_API_BASE.to_string(),
            max_retries: 0,
            nameservers: DEFAULT_NAMESERVERS.iter().map(ToString::to_string).collect(),
            warnings: Arc::new(LogWarningSink),
            differ: Arc::new(GroupDiffer),
        }
    }

    /// Override the API base URL (default: `https://desec.io/api/v1`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of automatic retries for transient transport errors (default: 0).
    ///
    /// Corrections are never retried as a whole.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Override the name servers reported by `nameservers()`.
    pub fn nameservers<I, S>(mut self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nameservers = nameservers.into_iter().map(Into::into).collect();
        self
    }

    /// Where capability warnings go (default: [`LogWarningSink`]).
    pub fn warning_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.warnings = sink;
        self
    }

    /// Replace the diff engine (default: [`GroupDiffer`]).
    pub fn differ(mut self, differ: Arc<dyn Differ>) -> Self {
        self.differ = differ;
        self
    }

    /// Validates the token locally, without touching the network.
    fn assemble(self) -> Result<DesecProvider> {
        let auth_token = self.auth_token.trim().to_string();
        if auth_token.is_empty() {
            return Err(ProviderError::MissingCredential {
                provider: PROVIDER_NAME.to_string(),
                field: crate::types::AUTH_TOKEN_KEY.to_string(),
            });
        }

        Ok(DesecProvider {
            client: create_http_client(PROVIDER_NAME)?,
            auth_token,
            base_url: self.base_url,
            max_retries: self.max_retries,
            nameservers: self.nameservers,
            domain_index: DomainIndex::default(),
            warnings: self.warnings,
            differ: self.differ,
        })
    }

    /// Build the provider and load the domain list.
    ///
    /// An empty token fails with [`ProviderError::MissingCredential`] before any request is
    /// sent. The domain list fetch doubles as a credential check.
    pub async fn build(self) -> Result<DesecProvider> {
        let provider = self.assemble()?;
        let domains = provider.fetch_domain_list().await?;
        provider.domain_index.replace(domains).await;
        log::debug!(
            "[{PROVIDER_NAME}] Loaded {} domains",
            provider.domain_index.len().await
        );
        Ok(provider)
    }
}

impl DesecProvider {
    /// Creates a provider with default settings and loads the domain list.
    pub async fn new(auth_token: impl Into<String>) -> Result<Self> {
        Self::builder(auth_token).build().await
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(auth_token: impl Into<String>) -> DesecProviderBuilder {
        DesecProviderBuilder::new(auth_token.into())
    }
}

#[cfg(test)]
impl DesecProvider {
    /// Provider with an empty domain index, for tests that never hit the network.
    pub(crate) fn offline(warnings: Arc<dyn WarningSink>) -> Self {
        match Self::builder("test-token").warning_sink(warnings).assemble() {
            Ok(p) => p,
            Err(e) => panic!("offline provider: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_token_fails_before_network() {
        // 不可达地址：若发出请求会得到 NetworkError 而不是 MissingCredential
        let res = DesecProvider::builder("   ")
            .base_url("http://127.0.0.1:9")
            .build()
            .await;
        assert!(
            matches!(&res, Err(ProviderError::MissingCredential { field, .. }) if field == "auth-token"),
            "unexpected result: {res:?}"
        );
    }

    #[test]
    fn builder_defaults() {
        let b = DesecProvider::builder("t");
        assert_eq!(b.base_url, DESEC_API_BASE);
        assert_eq!(b.max_retries, 0);
        assert_eq!(b.nameservers, vec!["ns1.desec.io", "ns2.desec.org"]);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let b = DesecProvider::builder("t").base_url("http://localhost:8000/api/v1/");
        assert_eq!(b.base_url, "http://localhost:8000/api/v1");
    }

    #[test]
    fn debug_masks_token() {
        let provider = DesecProvider::offline(Arc::new(LogWarningSink));
        let s = format!("{provider:?}");
        assert!(!s.contains("test-token"));
        assert!(s.contains("****"));
    }
}
