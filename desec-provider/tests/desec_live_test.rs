//! deSEC 真实 API 集成测试
//!
//! 运行方式:
//! ```bash
//! DESEC_TOKEN=xxx TEST_DOMAIN=example.com \
//!     cargo test -p desec-provider --test desec_live_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, generate_test_record_name};
use desec_provider::{DnsServiceProvider, DomainConfig, RecordConfig, RecordData, execute_corrections};

#[tokio::test]
#[ignore = "integration test: requires DESEC_TOKEN and TEST_DOMAIN"]
async fn test_desec_zone_records() {
    skip_if_no_credentials!("DESEC_TOKEN", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::desec().await, "创建测试上下文失败");
    require_ok!(
        ctx.provider.ensure_domain_exists(&ctx.domain).await,
        "ensure_domain_exists 调用失败"
    );

    let records = require_ok!(
        ctx.provider.get_zone_records(&ctx.domain).await,
        "get_zone_records 调用失败"
    );
    assert!(records.iter().all(|r| r.ttl >= 3600), "deSEC 记录 TTL 不应低于 3600");

    println!("✓ get_zone_records 测试通过，共 {} 条记录", records.len());
}

#[tokio::test]
#[ignore = "integration test: requires DESEC_TOKEN and TEST_DOMAIN"]
async fn test_desec_create_and_remove_txt() {
    skip_if_no_credentials!("DESEC_TOKEN", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::desec().await, "创建测试上下文失败");
    let existing = require_ok!(
        ctx.provider.get_zone_records(&ctx.domain).await,
        "get_zone_records 调用失败"
    );

    // 保留已有记录，只新增一条测试 TXT
    let name = generate_test_record_name();
    let mut desired = existing.clone();
    desired.push(RecordConfig::new(
        &name,
        &ctx.domain,
        3600,
        RecordData::TXT {
            text: "desec-provider live test".to_string(),
        },
    ));

    let create = require_ok!(
        ctx.provider
            .get_domain_corrections(&DomainConfig::new(&ctx.domain, desired.clone()))
            .await,
        "get_domain_corrections 调用失败"
    );
    assert_eq!(create.len(), 1, "应只有一条 CREATE");
    assert!(create[0].msg.starts_with("CREATE TXT"));
    for outcome in execute_corrections(create).await {
        assert!(outcome.result.is_ok(), "创建失败: {outcome:?}");
    }

    let again = require_ok!(
        ctx.provider
            .get_domain_corrections(&DomainConfig::new(&ctx.domain, desired))
            .await,
        "get_domain_corrections 调用失败"
    );
    assert!(again.is_empty(), "应用后应无差异");

    // 清理
    let remove = require_ok!(
        ctx.provider
            .get_domain_corrections(&DomainConfig::new(&ctx.domain, existing))
            .await,
        "get_domain_corrections 调用失败"
    );
    assert_eq!(remove.len(), 1, "应只有一条 DELETE");
    for outcome in execute_corrections(remove).await {
        assert!(outcome.result.is_ok(), "删除失败: {outcome:?}");
    }

    println!("✓ TXT {name} 创建与删除测试通过");
}
