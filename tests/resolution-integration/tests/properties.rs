//! 服务解析的跨 crate 行为测试

use binding_abstractions::{
    DataMethod, RestMethod, ServiceDeclaration, ServiceDescriptor, SoapMethod,
};
use binding_common::{
    ConfigurationError, HttpMethod, MetadataMarker, RetryMarker, DEFAULT_MAX_ATTEMPTS,
};
use binding_composition::ServiceBinder;
use binding_impl::RecordingTransport;
use settings_abstractions::{PreInitAction, SettingsRegistry};
use settings_impl::MapSettingsProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn binder_with(provider: MapSettingsProvider) -> ServiceBinder {
    init_test_logger();
    ServiceBinder::builder()
        .add_settings_provider(provider)
        .with_transport(Arc::new(RecordingTransport::new()))
        .build()
}

fn default_binder() -> ServiceBinder {
    binder_with(
        MapSettingsProvider::new()
            .with("domain", "https://global.example.com/")
            .with("host", "api.example.com"),
    )
}

#[derive(Debug, Default)]
struct OrderService {
    list: RestMethod,
    find: DataMethod,
    submit: SoapMethod,
    plain: RestMethod,
    external: RestMethod,
}

impl ServiceDeclaration for OrderService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("OrderService")
            .type_marker(MetadataMarker::domain("https://${host}"))
            .type_marker(MetadataMarker::header("A", "1"))
            .type_marker(MetadataMarker::content_type("json"))
            .type_marker(MetadataMarker::Retry(RetryMarker::new().with_max_attempts(3)))
            .default_constructor()
            .endpoint(
                "list",
                |s| &s.list,
                [
                    MetadataMarker::get("/orders"),
                    MetadataMarker::header("A", "2"),
                    MetadataMarker::content_type("xml"),
                    MetadataMarker::Retry(RetryMarker::new().with_delay_ms(200)),
                ],
            )
            .endpoint(
                "find",
                |s| &s.find,
                [MetadataMarker::get("/orders/{id}"), MetadataMarker::IgnoreRetry],
            )
            .endpoint("submit", |s| &s.submit, [MetadataMarker::post("/orders")])
            .endpoint("plain", |s| &s.plain, [])
            .endpoint(
                "external",
                |s| &s.external,
                [MetadataMarker::url("https://x/y"), MetadataMarker::get("")],
            )
            .build()
    }
}

#[derive(Default)]
struct GlobalOnlyService {
    ping: RestMethod,
}

impl ServiceDeclaration for GlobalOnlyService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("GlobalOnlyService")
            .default_constructor()
            .endpoint("ping", |s| &s.ping, [MetadataMarker::get("/ping")])
            .build()
    }
}

#[derive(Default)]
struct PlainDomainService {
    ping: RestMethod,
}

impl ServiceDeclaration for PlainDomainService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("PlainDomainService")
            .type_marker(MetadataMarker::domain("https://plain.example.com"))
            .default_constructor()
            .endpoint("ping", |s| &s.ping, [MetadataMarker::get("/ping")])
            .build()
    }
}

#[derive(Debug)]
struct PrivateConstructor {
    ping: RestMethod,
}

impl ServiceDeclaration for PrivateConstructor {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("PrivateConstructor")
            .endpoint("ping", |s| &s.ping, [])
            .build()
    }
}

/// 预初始化幂等：多次调用每个动作至多执行一次
#[test]
fn test_pre_init_is_idempotent() {
    init_test_logger();
    let counter = Arc::new(AtomicUsize::new(0));
    let action_counter = Arc::clone(&counter);

    let binder = ServiceBinder::builder()
        .add_settings_provider(MapSettingsProvider::new().with("host", "api.example.com"))
        .add_pre_init(PreInitAction::new("Counter", move || {
            action_counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .with_transport(Arc::new(RecordingTransport::new()))
        .build();

    for _ in 0..4 {
        binder.settings().pre_init().unwrap();
    }
    binder.resolve_default::<OrderService>().unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

/// 单例稳定：同一服务类型的两次解析返回同一实例
#[test]
fn test_singleton_stability() {
    let binder = default_binder();

    let first = binder.resolve_default::<OrderService>().unwrap();
    let second = binder
        .resolve_with_domain::<OrderService>("https://other.example.com")
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

/// 合并优先级：请求头追加，内容类型覆盖
#[test]
fn test_merge_precedence() {
    let binder = default_binder();
    let service = binder.resolve_default::<OrderService>().unwrap();

    let list = service.list.configuration().unwrap();
    let headers: Vec<(&str, &str)> = list
        .metadata
        .headers
        .iter()
        .map(|h| (h.name.as_str(), h.value.as_str()))
        .collect();
    assert_eq!(headers, vec![("A", "1"), ("A", "2")]);
    assert_eq!(list.metadata.content_type.as_deref(), Some("xml"));

    // 端点未声明时沿用类型级内容类型
    let plain = service.plain.configuration().unwrap();
    assert_eq!(plain.metadata.content_type.as_deref(), Some("json"));
}

/// 重试合并：按字段合并，忽略重试最终生效
#[test]
fn test_retry_merge() {
    let binder = default_binder();
    let service = binder.resolve_default::<OrderService>().unwrap();

    let list = service.list.configuration().unwrap().metadata.retry.unwrap();
    assert_eq!(list.max_attempts, Some(3));
    assert_eq!(list.delay, Some(Duration::from_millis(200)));

    assert!(service.find.configuration().unwrap().metadata.retry.is_none());

    let submit = service.submit.configuration().unwrap().metadata.retry.unwrap();
    assert_eq!(submit.max_attempts, Some(3));
    assert!(submit.delay.is_none());
    assert_ne!(submit.effective_max_attempts(), DEFAULT_MAX_ATTEMPTS);
}

/// 域名优先级：端点地址 > 域名覆盖 > 类型域名标记 > 全局默认域名
#[test]
fn test_domain_precedence() {
    let binder = default_binder();

    let service = binder
        .resolve_with_domain::<OrderService>("https://override.example.com")
        .unwrap();
    assert_eq!(
        service.external.configuration().unwrap().base_url.as_deref(),
        Some("https://x/y")
    );
    assert_eq!(
        service.list.configuration().unwrap().base_url.as_deref(),
        Some("https://override.example.com")
    );

    let service = binder.resolve_default::<OrderService>().unwrap();
    assert_eq!(
        service.list.configuration().unwrap().base_url.as_deref(),
        Some("https://api.example.com")
    );

    let global = binder.resolve_default::<GlobalOnlyService>().unwrap();
    assert_eq!(
        global.ping.configuration().unwrap().base_url.as_deref(),
        Some("https://global.example.com")
    );
}

/// 域名覆盖同样替换占位符，并保留末尾斜杠
#[test]
fn test_domain_override_is_template_substituted() {
    let binder = default_binder();
    let service = binder
        .resolve_with_domain::<OrderService>("https://${host}/")
        .unwrap();

    assert_eq!(
        service.list.configuration().unwrap().base_url.as_deref(),
        Some("https://api.example.com/")
    );
}

/// 占位符替换：`${host}` 被替换，无占位符的域名原样保留
#[test]
fn test_template_substitution() {
    let binder = default_binder();

    let service = binder.resolve_default::<OrderService>().unwrap();
    assert_eq!(
        service.plain.configuration().unwrap().base_url.as_deref(),
        Some("https://api.example.com")
    );

    let plain = binder.resolve_default::<PlainDomainService>().unwrap();
    assert_eq!(
        plain.ping.configuration().unwrap().base_url.as_deref(),
        Some("https://plain.example.com")
    );
}

/// 没有方法标记的端点解析为 GET 且路径为空
#[test]
fn test_method_default() {
    let binder = default_binder();
    let service = binder.resolve_default::<OrderService>().unwrap();

    let plain = service.plain.configuration().unwrap();
    assert_eq!(plain.method, HttpMethod::Get);
    assert!(plain.path.is_none());

    let submit = service.submit.configuration().unwrap();
    assert_eq!(submit.method, HttpMethod::Post);
    assert_eq!(submit.path.as_deref(), Some("/orders"));
}

/// 失败命名：缺少无参构造的服务类型报告其名称
#[test]
fn test_instantiation_failure_names_type() {
    let binder = default_binder();
    let error = binder.resolve_default::<PrivateConstructor>().unwrap_err();

    assert!(matches!(error, ConfigurationError::InstantiationFailed { .. }));
    assert!(error.to_string().contains("PrivateConstructor"));
}

/// 未知的占位符名称终止解析并指明端点与服务
#[test]
fn test_unknown_placeholder_aborts_resolution() {
    let binder = binder_with(MapSettingsProvider::new());
    let error = binder.resolve_default::<OrderService>().unwrap_err();

    let message = error.to_string();
    assert!(message.contains("OrderService"));
    assert!(matches!(
        error.root_cause(),
        ConfigurationError::DomainResolutionFailed { name, .. } if name == "host"
    ));
}
