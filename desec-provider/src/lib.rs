//! # desec-provider
//!
//! deSEC backend for DNS-as-code orchestration. Given the declared state of a zone it reads
//! the live record sets from [deSEC](https://desec.io), fits the declaration into what deSEC
//! accepts, and plans the corrections that converge the two.
//!
//! ## How a zone is reconciled
//!
//! 1. Desired records are normalized: ALIAS records are dropped and TTLs below 3600 are
//!    raised. Each adjustment is reported to a [`WarningSink`].
//! 2. The remote zone is read and every record set is exploded into one
//!    [`RecordConfig`] per value.
//! 3. A [`Differ`] reports changed (name, type) groups with one message per change.
//! 4. Each changed group becomes exactly one write: the whole record set is replaced, or
//!    written empty to delete it. Extra messages for the same group are no-ops.
//!
//! Corrections are returned unexecuted. Run them with [`execute_corrections`] or one by one
//! with [`Correction::execute`]; a failed correction never stops the rest.
//!
//! ## TLS Backend
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use desec_provider::{
//!     DesecProvider, DnsServiceProvider, DomainConfig, RecordConfig, RecordData,
//!     execute_corrections,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = DesecProvider::new("your-token").await?;
//!     provider.ensure_domain_exists("example.com").await?;
//!
//!     let dc = DomainConfig::new(
//!         "example.com",
//!         vec![RecordConfig::new(
//!             "@",
//!             "example.com",
//!             3600,
//!             RecordData::A { address: "192.0.2.1".to_string() },
//!         )],
//!     );
//!
//!     let corrections = provider.get_domain_corrections(&dc).await?;
//!     for outcome in execute_corrections(corrections).await {
//!         match outcome.result {
//!             Ok(()) => println!("{}", outcome.msg),
//!             Err(e) => eprintln!("{}: {e}", outcome.msg),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::MissingCredential`]: no token; raised before any request
//! - [`ProviderError::InvalidCredentials`]: the token was rejected
//! - [`ProviderError::InvariantViolation`]: planning produced an impossible write
//! - [`ProviderError::RateLimited`] / [`ProviderError::NetworkError`]: transient, retried
//!   only when the provider was built with `max_retries > 0`

mod diff;
mod error;
mod factory;
mod http_client;
mod models;
mod providers;
mod traits;
mod types;
mod utils;

pub use diff::{ChangedGroups, Differ, GroupDiffer};

pub use error::{ProviderError, Result};

pub use factory::{create_provider, get_all_provider_metadata};

pub use models::{
    ContentError, Correction, CorrectionOutcome, DomainConfig, RecordConfig, RecordData,
    RecordKey, RecordType, execute_corrections, group_by_key, label_to_fqdn,
    normalize_domain_name, trim_domain_name,
};

pub use traits::{DnsServiceProvider, WarningSink};

pub use types::{
    AUTH_TOKEN_KEY, Capabilities, Capability, CredentialValidationError, FieldType, Nameserver,
    ProviderCredentialField, ProviderCredentials, ProviderMetadata, ProviderType, Support,
};

pub use utils::datetime;
pub use utils::warning_sink::{CollectingWarningSink, LogWarningSink};

pub use providers::{DesecProvider, DesecProviderBuilder};
