//! Provider factory functions and metadata.

use std::sync::Arc;

use crate::error::Result;
use crate::providers::DesecProvider;
use crate::traits::DnsServiceProvider;
use crate::types::{ProviderCredentials, ProviderMetadata};

/// Creates a [`DnsServiceProvider`] instance from the given credentials.
///
/// Construction is async: the provider loads its domain list, which also validates the
/// credentials.
///
/// # Examples
///
/// ```rust,no_run
/// use desec_provider::{create_provider, ProviderCredentials};
///
/// # async fn demo() -> desec_provider::Result<()> {
/// let provider = create_provider(ProviderCredentials::Desec {
///     auth_token: "your-token".to_string(),
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_provider(
    credentials: ProviderCredentials,
) -> Result<Arc<dyn DnsServiceProvider>> {
    match credentials {
        ProviderCredentials::Desec { auth_token } => {
            Ok(Arc::new(DesecProvider::new(auth_token).await?))
        }
    }
}

/// Returns metadata for all available providers.
pub fn get_all_provider_metadata() -> Vec<ProviderMetadata> {
    vec![DesecProvider::metadata()]
}
