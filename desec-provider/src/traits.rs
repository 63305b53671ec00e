use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::models::{Correction, DomainConfig, RecordConfig};
use crate::types::{Nameserver, ProviderMetadata};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（HTTP 状态码）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 出错字段名（用于 `InvalidParameter` 的参数名）
    pub field: Option<String>,
    /// 域名（用于 `DomainNotFound`）
    pub domain: Option<String>,
}

/// Provider 错误映射 Trait（内部使用）
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Receives capability warnings (dropped records, raised TTLs).
///
/// Warnings are user-facing; they never abort planning.
pub trait WarningSink: Send + Sync {
    fn warn(&self, msg: &str);
}

/// DNS 服务提供商 Trait
///
/// Reconciles a declared zone against the provider's live state.
#[async_trait]
pub trait DnsServiceProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 Provider 元数据（类型级别）
    ///
    /// 此方法不需要实例，可以在创建 Provider 之前调用。
    fn metadata() -> ProviderMetadata
    where
        Self: Sized;

    /// Authoritative name servers to delegate the domain to.
    fn nameservers(&self, domain: &str) -> Vec<Nameserver>;

    /// Computes the corrections that converge the remote zone to `dc`.
    ///
    /// The returned corrections are not executed. An empty list means the zone is in sync.
    async fn get_domain_corrections(&self, dc: &DomainConfig) -> Result<Vec<Correction>>;

    /// Reads the remote zone as generic records, one per value.
    async fn get_zone_records(&self, domain: &str) -> Result<Vec<RecordConfig>>;

    /// Creates the zone remotely unless it already exists.
    async fn ensure_domain_exists(&self, domain: &str) -> Result<()>;
}
