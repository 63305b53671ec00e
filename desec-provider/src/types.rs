use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::RecordType;

// ============ Provider Types ============

/// Identifies which DNS provider implementation to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// deSEC (<https://desec.io>).
    Desec,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Desec => write!(f, "desec"),
        }
    }
}

/// An authoritative name server the domain should be delegated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nameserver {
    /// Host name without trailing dot (e.g., `"ns1.desec.io"`).
    pub name: String,
}

impl Nameserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ============ Capability Types ============

/// Level of support a provider declares for a capability.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// Supported.
    Can,
    /// Structurally impossible with this provider.
    Cannot,
    /// Possible in principle but not implemented here.
    Unimplemented,
}

/// Features a provider may or may not support.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Can be combined with a second DNS provider for the same zone.
    DualHost,
    /// Maintained by the provider's vendor.
    OfficiallySupported,
    /// Can create zones on demand.
    CreateDomains,
    Alias,
    Srv,
    Sshfp,
    Caa,
    Tlsa,
    Ptr,
    /// Can enumerate existing zone contents.
    GetZones,
    /// DNSSEC signing can be toggled through the API.
    AutoDnssec,
}

/// Declared capability table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Capabilities(BTreeMap<Capability, Support>);

impl Capabilities {
    #[must_use]
    pub fn with(mut self, capability: Capability, support: Support) -> Self {
        self.0.insert(capability, support);
        self
    }

    /// Declared support; capabilities absent from the table count as [`Support::Cannot`].
    pub fn get(&self, capability: Capability) -> Support {
        self.0.get(&capability).copied().unwrap_or(Support::Cannot)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.get(capability) == Support::Can
    }

    /// Whether records of this type may be sent to the provider.
    pub fn supports(&self, record_type: RecordType) -> bool {
        match record_type {
            RecordType::A
            | RecordType::Aaaa
            | RecordType::Cname
            | RecordType::Mx
            | RecordType::Txt
            | RecordType::Ns => true,
            RecordType::Srv => self.can(Capability::Srv),
            RecordType::Caa => self.can(Capability::Caa),
            RecordType::Tlsa => self.can(Capability::Tlsa),
            RecordType::Ptr => self.can(Capability::Ptr),
            RecordType::Alias => self.can(Capability::Alias),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, Support)> + '_ {
        self.0.iter().map(|(c, s)| (*c, *s))
    }
}

// ============ Provider Metadata Types ============

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field required by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCredentialField {
    /// Machine-readable field key (e.g., `"auth-token"`).
    pub key: String,
    /// Human-readable label (e.g., `"Auth Token"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a DNS provider.
///
/// Obtain via [`DnsServiceProvider::metadata()`](crate::DnsServiceProvider::metadata) or
/// [`get_all_provider_metadata()`](crate::get_all_provider_metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderMetadata {
    /// Provider type identifier.
    pub id: ProviderType,
    /// Human-readable provider name.
    pub name: String,
    /// Short description of the provider.
    pub description: String,
    /// Credential fields required to authenticate with this provider.
    pub required_fields: Vec<ProviderCredentialField>,
    /// Declared capability table.
    pub capabilities: Capabilities,
}

// ============ Credential Types ============

/// Validation error for provider credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        provider: ProviderType,
        field: String,
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        provider: ProviderType,
        field: String,
        label: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container.
///
/// Pass this to [`create_provider()`](crate::create_provider) to instantiate a provider.
///
/// # Serialization
///
/// ```json
/// { "provider": "desec", "credentials": { "auth_token": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// deSEC credentials.
    #[serde(rename = "desec")]
    Desec {
        /// deSEC API token.
        auth_token: String,
    },
}

/// Credential map key holding the deSEC token.
pub const AUTH_TOKEN_KEY: &str = "auth-token";

impl ProviderCredentials {
    /// Construct credentials from a flat key-value map, validating required fields.
    pub fn from_map(
        provider: &ProviderType,
        map: &HashMap<String, String>,
    ) -> Result<Self, CredentialValidationError> {
        match provider {
            ProviderType::Desec => Ok(Self::Desec {
                auth_token: Self::get_required_field(provider, map, AUTH_TOKEN_KEY, "Auth Token")?,
            }),
        }
    }

    /// Obtain required fields from `HashMap` and verify that it is not empty
    fn get_required_field(
        provider: &ProviderType,
        map: &HashMap<String, String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match map.get(key) {
            None => Err(CredentialValidationError::MissingField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                provider: provider.clone(),
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> HashMap<String, String> {
        match self {
            Self::Desec { auth_token } => {
                [(AUTH_TOKEN_KEY.to_string(), auth_token.clone())].into()
            }
        }
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Desec { .. } => ProviderType::Desec,
        }
    }
}
