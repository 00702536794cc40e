//! 进程级绑定器与便捷入口测试
//!
//! 同一测试进程共享全局绑定器，测试之间通过锁串行执行

use binding_abstractions::{RestMethod, ServiceDeclaration, ServiceDescriptor};
use binding_common::{BasicAuthentication, MetadataMarker, RequestSpecification, ServiceSettings};
use binding_composition::{
    init, init_with_auth, init_with_domain, init_with_settings, init_with_spec, ServiceBinder,
};
use settings_abstractions::SettingsRegistry;
use settings_impl::MapSettingsProvider;
use std::sync::{Arc, Mutex, MutexGuard};

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct CatalogService {
    search: RestMethod,
}

impl ServiceDeclaration for CatalogService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("CatalogService")
            .type_marker(MetadataMarker::domain("https://${catalog_host}"))
            .default_constructor()
            .endpoint("search", |s| &s.search, [MetadataMarker::get("/search")])
            .build()
    }
}

#[derive(Default)]
struct AbsoluteService {
    health: RestMethod,
}

impl ServiceDeclaration for AbsoluteService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("AbsoluteService")
            .default_constructor()
            .endpoint(
                "health",
                |s| &s.health,
                [MetadataMarker::url("https://status.example.com"), MetadataMarker::get("/health")],
            )
            .build()
    }
}

#[test]
fn test_init_with_literal_domain_override() {
    let _lock = serial();
    ServiceBinder::reset_global();

    let service = init_with_domain::<CatalogService>("https://catalog.local").unwrap();
    let configuration = service.search.configuration().unwrap();

    assert_eq!(configuration.base_url.as_deref(), Some("https://catalog.local"));
    assert_eq!(configuration.path.as_deref(), Some("/search"));
}

#[test]
fn test_init_reads_registered_provider() {
    let _lock = serial();
    ServiceBinder::reset_global();

    ServiceBinder::global().settings().register_provider(Arc::new(
        MapSettingsProvider::new()
            .with("catalog_host", "catalog.example.com")
            .with_priority(10),
    ));

    let service = init::<CatalogService>().unwrap();
    assert_eq!(
        service.search.configuration().unwrap().base_url.as_deref(),
        Some("https://catalog.example.com")
    );
    assert!(ServiceBinder::global().settings().is_initialized());
}

#[test]
fn test_init_with_spec_and_auth() {
    let _lock = serial();
    ServiceBinder::reset_global();

    let service = init_with_spec::<AbsoluteService>(
        RequestSpecification::new().header("X-Env", "test"),
    )
    .unwrap();
    let configuration = service.health.configuration().unwrap();
    assert_eq!(configuration.base_url.as_deref(), Some("https://status.example.com"));
    assert!(configuration.request_specification.is_some());

    let service = init_with_auth::<AbsoluteService>(Arc::new(BasicAuthentication::new(
        "user", "pass",
    )))
    .unwrap();
    let configuration = service.health.configuration().unwrap();
    assert!(configuration.request_specification.is_none());
    assert!(configuration.authentication_scheme.is_some());
}

#[test]
fn test_reset_global_drops_singletons() {
    let _lock = serial();
    ServiceBinder::reset_global();

    let settings = ServiceSettings::with_domain("https://one.local");
    let first = init_with_settings::<AbsoluteService>(&settings).unwrap();
    let again = init_with_settings::<AbsoluteService>(&settings).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    ServiceBinder::reset_global();
    assert!(!ServiceBinder::global().settings().is_initialized());

    let fresh = init_with_settings::<AbsoluteService>(&settings).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    // 旧实例保留已写入的执行器
    assert!(first.health.is_resolved());
}
