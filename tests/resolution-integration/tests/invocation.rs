//! 解析后端点调用的端到端测试

use binding_abstractions::{DataMethod, RestMethod, ServiceDeclaration, ServiceDescriptor, SoapMethod};
use binding_common::{
    BearerToken, Credentials, HttpMethod, InvocationError, MetadataMarker, RawResponse,
    RequestArgs, RequestSpecification, RetryMarker, RetryTrigger, ServiceSettings,
    StatusErrorHandler, TransportError,
};
use binding_composition::ServiceBinder;
use binding_impl::RecordingTransport;
use serde::Deserialize;
use settings_impl::MapSettingsProvider;
use std::sync::Arc;

#[derive(Default)]
struct InventoryService {
    item: DataMethod,
    restock: RestMethod,
    legacy: SoapMethod,
    flaky: RestMethod,
}

impl ServiceDeclaration for InventoryService {
    fn declaration() -> ServiceDescriptor<Self> {
        ServiceDescriptor::<Self>::builder("InventoryService")
            .type_marker(MetadataMarker::domain("https://${inventory}/"))
            .type_marker(MetadataMarker::header("X-Client", "integration"))
            .default_constructor()
            .endpoint(
                "item",
                |s| &s.item,
                [MetadataMarker::get("/items/{sku}"), MetadataMarker::IgnoreRetry],
            )
            .endpoint(
                "restock",
                |s| &s.restock,
                [
                    MetadataMarker::post("/items/{sku}/restock"),
                    MetadataMarker::query("notify", "true"),
                ],
            )
            .endpoint(
                "legacy",
                |s| &s.legacy,
                [MetadataMarker::url("https://soap.example.com/ws")],
            )
            .endpoint(
                "flaky",
                |s| &s.flaky,
                [
                    MetadataMarker::get("/flaky"),
                    MetadataMarker::Retry(
                        RetryMarker::new()
                            .with_max_attempts(3)
                            .with_trigger(RetryTrigger::on_status(&[503])),
                    ),
                ],
            )
            .build()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    sku: String,
    stock: u32,
}

fn binder(transport: Arc<RecordingTransport>) -> ServiceBinder {
    ServiceBinder::builder()
        .add_settings_provider(MapSettingsProvider::new().with("inventory", "inventory.local"))
        .with_transport(transport)
        .build()
}

#[tokio::test]
async fn test_data_endpoint_decodes_response() {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(
        RawResponse::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"sku":"A-1","stock":7}"#),
    );

    let service = binder(Arc::clone(&transport))
        .resolve_default::<InventoryService>()
        .unwrap();
    let item: Item = service
        .item
        .call_as(RequestArgs::path(["A-1"]))
        .await
        .unwrap();

    assert_eq!(item, Item { sku: "A-1".to_string(), stock: 7 });

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url, "https://inventory.local/items/A-1");
    assert_eq!(request.header("X-Client"), Some("integration"));
    assert_eq!(request.header("Accept"), Some("application/json"));
}

#[tokio::test]
async fn test_rest_endpoint_sends_metadata_and_auth() {
    let transport = Arc::new(RecordingTransport::new());
    let settings = ServiceSettings::builder()
        .request_specification(RequestSpecification::new().header("X-Trace", "t-1"))
        .authentication_scheme(Arc::new(BearerToken::new("secret")))
        .build();

    let service = binder(Arc::clone(&transport))
        .resolve::<InventoryService>(&settings)
        .unwrap();
    let response = service
        .restock
        .call(RequestArgs::path(["B-2"]).body(r#"{"amount":5}"#))
        .await
        .unwrap();

    assert!(response.is_ok());
    assert_eq!(response.attempts(), 1);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://inventory.local/items/B-2/restock");
    assert_eq!(request.header("X-Trace"), Some("t-1"));
    assert_eq!(
        request.query_params,
        vec![("notify".to_string(), "true".to_string())]
    );
    assert_eq!(request.body.as_deref(), Some(r#"{"amount":5}"#));
    assert_eq!(
        request.credentials,
        Some(Credentials::Bearer("secret".to_string()))
    );
}

#[tokio::test]
async fn test_soap_endpoint_wraps_envelope() {
    let transport = Arc::new(RecordingTransport::new());
    let service = binder(Arc::clone(&transport))
        .resolve_default::<InventoryService>()
        .unwrap();

    service.legacy.call_body("<Ping/>").await.unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://soap.example.com/ws");
    let body = request.body.unwrap();
    assert!(body.contains(":Envelope"));
    assert!(body.contains("<Ping/>"));
    assert!(request
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("text/xml")));
}

#[tokio::test]
async fn test_retry_policy_drives_attempts() {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(RawResponse::new(503));
    transport.push_failure(TransportError::Timeout {
        url: "https://inventory.local/flaky".to_string(),
    });
    transport.push_response(RawResponse::new(200));

    let service = binder(Arc::clone(&transport))
        .resolve_default::<InventoryService>()
        .unwrap();
    let response = service.flaky.call(RequestArgs::new()).await.unwrap();

    // 传输失败同样触发重试
    assert_eq!(response.status(), 200);
    assert_eq!(response.attempts(), 3);
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test]
async fn test_error_handler_rejects_response() {
    let transport = Arc::new(RecordingTransport::new());
    transport.push_response(RawResponse::new(404).with_body("missing"));

    let settings = ServiceSettings::builder()
        .error_handler(Arc::new(StatusErrorHandler))
        .build();
    let service = binder(Arc::clone(&transport))
        .resolve::<InventoryService>(&settings)
        .unwrap();

    let error = service
        .item
        .call(RequestArgs::path(["X"]))
        .await
        .unwrap_err();
    assert!(matches!(error, InvocationError::Rejected { status: 404, .. }));
}

#[tokio::test]
async fn test_unresolved_slot_is_rejected() {
    let service = InventoryService::default();
    let error = service.restock.call(RequestArgs::new()).await.unwrap_err();

    assert!(matches!(error, InvocationError::UnresolvedSlot { .. }));
}
