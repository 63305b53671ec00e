//! deSEC error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{DesecProvider, PROVIDER_NAME};

/// deSEC reports errors through HTTP status codes; the body only carries a message.
/// Reference: <https://desec.readthedocs.io/en/latest/dns/domains.html>
impl ProviderErrorMapper for DesecProvider {
    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("401") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // 403 也用于域名数量上限
            Some("403") if raw.message.to_lowercase().contains("limit") => {
                ProviderError::QuotaExceeded {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }
            Some("403") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("404") => ProviderError::DomainNotFound {
                provider: self.provider_name().to_string(),
                domain: context.domain.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            Some("400") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: context.field.unwrap_or_else(|| "request".to_string()),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::utils::warning_sink::LogWarningSink;

    fn provider() -> DesecProvider {
        DesecProvider::offline(Arc::new(LogWarningSink))
    }

    fn ctx() -> ErrorContext {
        ErrorContext::default()
    }

    #[test]
    fn unauthorized_is_invalid_credentials() {
        let err = provider().map_error(
            RawApiError::with_code("401", "Invalid token."),
            ctx(),
        );
        assert!(
            matches!(&err, ProviderError::InvalidCredentials { raw_message: Some(m), .. } if m == "Invalid token."),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn forbidden_is_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code(
                "403",
                "You do not have permission to perform this action.",
            ),
            ctx(),
        );
        assert!(
            matches!(err, ProviderError::PermissionDenied { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn domain_limit_is_quota_exceeded() {
        let err = provider().map_error(
            RawApiError::with_code(
                "403",
                "Domain limit 15 exceeded. Please contact support to create additional domains.",
            ),
            ctx(),
        );
        assert!(
            matches!(err, ProviderError::QuotaExceeded { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn not_found_uses_domain_context() {
        let err = provider().map_error(
            RawApiError::with_code("404", "Not found."),
            ErrorContext {
                field: None,
                domain: Some("example.com".to_string()),
            },
        );
        assert!(
            matches!(&err, ProviderError::DomainNotFound { domain, .. } if domain == "example.com"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn bad_request_uses_field_context() {
        let err = provider().map_error(
            RawApiError::with_code("400", "Ensure this value is greater than or equal to 3600."),
            ErrorContext {
                field: Some("ttl".to_string()),
                domain: Some("example.com".to_string()),
            },
        );
        assert!(
            matches!(&err, ProviderError::InvalidParameter { param, .. } if param == "ttl"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn bad_request_without_field() {
        let err = provider().map_error(RawApiError::with_code("400", "Bad request"), ctx());
        assert!(
            matches!(&err, ProviderError::InvalidParameter { param, .. } if param == "request"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn conflict_falls_back_to_unknown() {
        let err = provider().map_error(
            RawApiError::with_code("409", "This domain name conflicts with an existing zone."),
            ctx(),
        );
        assert!(
            matches!(&err, ProviderError::Unknown { raw_code: Some(c), .. } if c == "409"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_code_falls_back_to_unknown() {
        let err = provider().map_error(
            RawApiError {
                code: None,
                message: "boom".to_string(),
            },
            ctx(),
        );
        assert!(
            matches!(err, ProviderError::Unknown { raw_code: None, .. }),
            "unexpected error: {err:?}"
        );
    }
}
