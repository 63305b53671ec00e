//! Provider 公共工具函数

use std::time::Duration;

use reqwest::Client;

use crate::error::{ProviderError, Result};

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

// ============ 域名名称处理 ============

/// 将完整域名转换为 deSEC subname（apex 为空字符串，而非 "@"）
/// 如: "www.example.com" + "example.com" -> "www"
/// 如: "example.com" + "example.com" -> ""
pub fn fqdn_to_subname(fqdn: &str, zone: &str) -> String {
    let full = fqdn.trim_end_matches('.').to_lowercase();
    let zone = zone.trim_end_matches('.').to_lowercase();

    if full == zone {
        String::new()
    } else if let Some(sub) = full.strip_suffix(&format!(".{zone}")) {
        sub.to_string()
    } else {
        full
    }
}

/// 将 subname 转换为完整域名
/// 如: "www" + "example.com" -> "www.example.com"
/// 如: "" + "example.com" -> "example.com"
pub fn subname_to_fqdn(subname: &str, zone: &str) -> String {
    let zone = zone.trim_end_matches('.').to_lowercase();

    if subname.is_empty() || subname == "@" {
        zone
    } else {
        format!("{}.{zone}", subname.to_lowercase())
    }
}
