//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::env;
use std::sync::{Arc, Mutex};

use desec_provider::{CollectingWarningSink, DesecProvider, Result};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";
pub const API_PREFIX: &str = "/api/v1";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试记录名称
pub fn generate_test_record_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("_test-{}", &uuid.to_string()[..8])
}

/// API base URL of a mock server.
pub fn base_url(server: &MockServer) -> String {
    format!("{}{API_PREFIX}", server.uri())
}

/// Path of the rrsets endpoint for `zone`.
pub fn rrsets_path(zone: &str) -> String {
    format!("{API_PREFIX}/domains/{zone}/rrsets/")
}

/// `GET /domains/` answering with the given zone names.
pub async fn mount_domains(server: &MockServer, zones: &[&str]) {
    let body: Vec<Value> = zones
        .iter()
        .map(|z| json!({ "name": z, "created": "2024-01-02T03:04:05.123456Z", "minimum_ttl": 3600 }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/domains/")))
        .and(header("Authorization", format!("Token {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Provider pointed at the mock server with warnings collected.
pub async fn build_provider(
    server: &MockServer,
    warnings: Arc<CollectingWarningSink>,
) -> Result<DesecProvider> {
    DesecProvider::builder(TEST_TOKEN)
        .base_url(base_url(server))
        .warning_sink(warnings)
        .build()
        .await
}

// ============ In-memory deSEC zone ============

type RrsetKey = (String, String);

/// In-memory deSEC zone served through wiremock.
///
/// `GET .../rrsets/` lists the current sets; `PUT .../rrsets/` applies a bulk write where an
/// empty `records` list deletes the set.
#[derive(Clone, Default)]
pub struct FakeZone {
    rrsets: Arc<Mutex<BTreeMap<RrsetKey, Value>>>,
    puts: Arc<Mutex<Vec<Value>>>,
}

impl FakeZone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record set.
    pub fn with(self, subname: &str, record_type: &str, ttl: u32, records: &[&str]) -> Self {
        self.rrsets.lock().unwrap().insert(
            (subname.to_string(), record_type.to_string()),
            json!({
                "subname": subname,
                "type": record_type,
                "ttl": ttl,
                "records": records,
            }),
        );
        self
    }

    pub async fn mount(&self, server: &MockServer, zone: &str) {
        Mock::given(method("GET"))
            .and(path(rrsets_path(zone)))
            .respond_with(ListRrsets {
                zone: self.clone(),
                domain: zone.to_string(),
            })
            .mount(server)
            .await;
        Mock::given(method("PUT"))
            .and(path(rrsets_path(zone)))
            .respond_with(PutRrsets { zone: self.clone() })
            .mount(server)
            .await;
    }

    /// Current sets as `(subname, type) -> records`.
    pub fn snapshot(&self) -> BTreeMap<RrsetKey, Vec<String>> {
        self.rrsets
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| {
                let records = v["records"]
                    .as_array()
                    .map(|a| a.iter().filter_map(|r| r.as_str().map(str::to_string)).collect())
                    .unwrap_or_default();
                (k.clone(), records)
            })
            .collect()
    }

    /// Every item received through `PUT`, in arrival order.
    pub fn puts(&self) -> Vec<Value> {
        self.puts.lock().unwrap().clone()
    }

    fn list(&self, domain: &str) -> Vec<Value> {
        self.rrsets
            .lock()
            .unwrap()
            .values()
            .map(|v| {
                let mut v = v.clone();
                v["domain"] = json!(domain);
                v["created"] = json!("2024-01-02T03:04:05.123456Z");
                v["touched"] = json!("2024-01-02T03:04:05.123456Z");
                v
            })
            .collect()
    }

    fn apply(&self, items: Vec<Value>) {
        let mut rrsets = self.rrsets.lock().unwrap();
        for item in items {
            let key = (
                item["subname"].as_str().unwrap_or_default().to_string(),
                item["type"].as_str().unwrap_or_default().to_string(),
            );
            let empty = item["records"].as_array().is_none_or(Vec::is_empty);
            if empty {
                rrsets.remove(&key);
            } else {
                rrsets.insert(key, item.clone());
            }
            self.puts.lock().unwrap().push(item);
        }
    }
}

struct ListRrsets {
    zone: FakeZone,
    domain: String,
}

impl Respond for ListRrsets {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(self.zone.list(&self.domain))
    }
}

struct PutRrsets {
    zone: FakeZone,
}

impl Respond for PutRrsets {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match request.body_json::<Vec<Value>>() {
            Ok(items) => {
                let echoed: Vec<Value> = items
                    .iter()
                    .filter(|i| i["records"].as_array().is_some_and(|r| !r.is_empty()))
                    .cloned()
                    .collect();
                self.zone.apply(items);
                ResponseTemplate::new(200).set_body_json(echoed)
            }
            Err(e) => ResponseTemplate::new(400)
                .set_body_json(json!({ "non_field_errors": [format!("JSON parse error - {e}")] })),
        }
    }
}

// ============ Live API context ============

/// 测试上下文 - 封装真实 deSEC Provider 和测试域名
pub struct TestContext {
    pub provider: DesecProvider,
    pub domain: String,
}

impl TestContext {
    /// 创建 deSEC 测试上下文
    pub async fn desec() -> Option<Self> {
        let token = env::var("DESEC_TOKEN").ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        let provider = DesecProvider::builder(token)
            .max_retries(3)
            .build()
            .await
            .ok()?;
        Some(Self { provider, domain })
    }
}
