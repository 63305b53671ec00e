//! deSEC HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpResponse, HttpUtils};
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::DesecProvider;
use super::types::ErrorResponse;

impl DesecProvider {
    // ==================== 辅助方法 ====================

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Token {}", self.auth_token))
            .header("Accept", "application/json")
    }

    /// 统一处理 deSEC 响应错误
    fn handle_response_error(&self, resp: &HttpResponse, mut ctx: ErrorContext) -> Result<()> {
        if resp.is_success() {
            return Ok(());
        }

        let (field, message) = extract_error_message(&resp.body)
            .unwrap_or_else(|| (None, truncate_for_log(&resp.body)));
        if ctx.field.is_none() {
            ctx.field = field;
        }

        log::error!(
            "[{}] API error (HTTP {}): {message}",
            self.provider_name(),
            resp.status
        );
        Err(self.map_error(
            RawApiError::with_code(resp.status.to_string(), message),
            ctx,
        ))
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        let mut request = self.request(method.clone(), url);
        if let Some(payload) = body {
            log::debug!(
                "[{}] Request Body: {}",
                self.provider_name(),
                truncate_for_log(&payload)
            );
            request = request
                .header("Content-Type", "application/json")
                .body(payload);
        }

        HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            method.as_str(),
            url,
            self.max_retries,
        )
        .await
    }

    fn serialize<B: Serialize>(&self, body: &B) -> Result<String> {
        serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })
    }

    // ==================== API 方法 ====================

    /// GET 并跟随 `Link: rel="next"` 拉取全部分页
    pub(crate) async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: ErrorContext,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut url = self.url(path);

        loop {
            let resp = self.send(Method::GET, &url, None).await?;
            self.handle_response_error(&resp, ctx.clone())?;

            let page: Vec<T> = HttpUtils::parse_json(&resp.body, self.provider_name())?;
            items.extend(page);

            match resp.next_page {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }

        Ok(items)
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B, ctx: ErrorContext) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let payload = self.serialize(body)?;
        let resp = self.send(Method::POST, &self.url(path), Some(payload)).await?;
        self.handle_response_error(&resp, ctx)?;
        HttpUtils::parse_json(&resp.body, self.provider_name())
    }

    /// 执行 PUT 请求（响应体忽略）
    pub(crate) async fn put<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<()> {
        let payload = self.serialize(body)?;
        let resp = self.send(Method::PUT, &self.url(path), Some(payload)).await?;
        self.handle_response_error(&resp, ctx)
    }
}

/// Pulls a human-readable message out of a deSEC error body.
///
/// deSEC answers `{"detail": "..."}` for generic failures and field -> messages maps
/// (nested in a list for bulk requests) for validation failures. Returns the offending
/// field name when there is one.
fn extract_error_message(body: &str) -> Option<(Option<String>, String)> {
    if let Ok(ErrorResponse {
        detail: Some(detail),
    }) = serde_json::from_str::<ErrorResponse>(body)
    {
        return Some((None, detail));
    }

    let value: Value = serde_json::from_str(body).ok()?;
    first_error(&value, None)
}

fn first_error(value: &Value, field: Option<&str>) -> Option<(Option<String>, String)> {
    match value {
        Value::String(s) => Some((
            field.map(str::to_string),
            field.map_or_else(|| s.clone(), |f| format!("{f}: {s}")),
        )),
        Value::Array(items) => items.iter().find_map(|v| first_error(v, field)),
        Value::Object(map) => map.iter().find_map(|(k, v)| {
            let name = if k == "non_field_errors" { field } else { Some(k.as_str()) };
            first_error(v, name)
        }),
        _ => None,
    }
}
