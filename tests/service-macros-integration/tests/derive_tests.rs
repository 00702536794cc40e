//! `#[derive(Service)]` 生成的声明在解析引擎中的行为

use binding_abstractions::{DataMethod, MemberKind, RestMethod, ServiceDeclaration, SoapMethod};
use binding_common::{
    HttpMethod, MetadataMarker, RawResponse, RequestArgs, ResolvedCookie, RetryTrigger,
};
use binding_composition::ServiceBinder;
use binding_impl::RecordingTransport;
use serde::Deserialize;
use service_macros::Service;
use settings_impl::MapSettingsProvider;
use std::sync::Arc;
use std::time::Duration;

fn server_errors() -> RetryTrigger {
    RetryTrigger::on_status(&[500, 502, 503])
}

#[derive(Default, Service)]
#[service(
    domain = "https://${shop_host}/",
    header("X-Client", "derive"),
    content_type = "application/json",
    cookie("region", "eu"),
    retry(max_attempts = 3, trigger = server_errors)
)]
struct ShopService {
    #[endpoint(get = "/products", query("page", "1"), header("X-Client", "list"))]
    products: RestMethod,

    #[endpoint(get = "/products/{id}", ignore_retry)]
    product: DataMethod,

    #[endpoint(
        post = "/orders",
        content_type = "application/xml",
        retry(delay_ms = 50),
        cookie("session", "abc", additional = ["x", "y"])
    )]
    order: RestMethod,

    #[endpoint(url = "https://soap.shop.local/ws")]
    legacy: SoapMethod,

    #[endpoint(
        put = "/upload",
        multipart("file", "report.csv", "data/report.csv", "text/csv"),
        proxy("http", "proxy.local", 3128),
        trust_store("certs/ca.pem", "changeit")
    )]
    upload: RestMethod,

    bare: RestMethod,

    label: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Product {
    id: u64,
    name: String,
}

fn binder(transport: Arc<RecordingTransport>) -> ServiceBinder {
    ServiceBinder::builder()
        .add_settings_provider(MapSettingsProvider::new().with("shop_host", "shop.example.com"))
        .with_transport(transport)
        .build()
}

#[test]
fn test_descriptor_shape() {
    let descriptor = ShopService::declaration();

    assert_eq!(descriptor.name(), "ShopService");
    assert_eq!(descriptor.endpoint_count(), 6);
    assert!(descriptor.constructor().is_some());

    let names: Vec<&str> = descriptor.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["products", "product", "order", "legacy", "upload", "bare", "label"]
    );

    let label = descriptor.members().last().unwrap();
    assert!(matches!(label.kind, MemberKind::Other { type_name } if type_name == "String"));

    assert_eq!(
        descriptor.type_markers()[0],
        MetadataMarker::domain("https://${shop_host}/")
    );
    assert!(descriptor.members()[5].markers.is_empty());
}

#[test]
fn test_derived_service_resolves() {
    let transport = Arc::new(RecordingTransport::new());
    let service = binder(transport).resolve_default::<ShopService>().unwrap();

    let products = service.products.configuration().unwrap();
    assert_eq!(products.method, HttpMethod::Get);
    assert_eq!(products.base_url.as_deref(), Some("https://shop.example.com"));
    assert_eq!(products.metadata.header_values("X-Client"), vec!["derive", "list"]);
    assert_eq!(products.metadata.cookies, vec![ResolvedCookie::with_value("region", "eu")]);
    let retry = products.metadata.retry.unwrap();
    assert_eq!(retry.max_attempts, Some(3));
    assert_eq!(retry.trigger.map(|t| t.name().to_string()), Some(server_errors().name().to_string()));

    assert!(service.product.configuration().unwrap().metadata.retry.is_none());

    let order = service.order.configuration().unwrap();
    assert_eq!(order.method, HttpMethod::Post);
    assert_eq!(order.metadata.content_type.as_deref(), Some("application/xml"));
    let retry = order.metadata.retry.unwrap();
    assert_eq!(retry.max_attempts, Some(3));
    assert_eq!(retry.delay, Some(Duration::from_millis(50)));
    assert_eq!(
        order.metadata.cookies[1],
        ResolvedCookie::with_values("session", "abc", vec!["x".to_string(), "y".to_string()])
    );

    let legacy = service.legacy.configuration().unwrap();
    assert_eq!(legacy.base_url.as_deref(), Some("https://soap.shop.local/ws"));

    let upload = service.upload.configuration().unwrap();
    assert_eq!(upload.method, HttpMethod::Put);
    assert_eq!(upload.metadata.multipart.len(), 1);
    assert_eq!(upload.metadata.proxy.map(|p| p.url()), Some("http://proxy.local:3128".to_string()));
    assert_eq!(
        upload.metadata.trust_store.and_then(|t| t.password),
        Some("changeit".to_string())
    );

    let bare = service.bare.configuration().unwrap();
    assert_eq!(bare.method, HttpMethod::Get);
    assert!(bare.path.is_none());
}

#[tokio::test]
async fn test_derived_data_endpoint_invokes() {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(RawResponse::new(200).with_body(r#"{"id":42,"name":"lamp"}"#));

    let service = binder(Arc::clone(&transport))
        .resolve_default::<ShopService>()
        .unwrap();
    let product: Product = service
        .product
        .call_as(RequestArgs::path(["42"]))
        .await
        .unwrap();

    assert_eq!(product, Product { id: 42, name: "lamp".to_string() });
    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://shop.example.com/products/42");
    assert_eq!(request.cookie_header().as_deref(), Some("region=eu"));
}
