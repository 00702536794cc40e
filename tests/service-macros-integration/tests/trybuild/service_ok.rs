use binding_abstractions::{DataMethod, RestMethod, ServiceDeclaration, SoapMethod};
use service_macros::Service;

#[derive(Default, Service)]
#[service(domain = "https://${host}", header("X-Client", "ok"))]
struct OkService {
    #[endpoint(get = "/items")]
    list: RestMethod,

    #[endpoint(url = "https://soap.local/ws")]
    legacy: SoapMethod,

    lookup: DataMethod,
}

fn main() {
    let descriptor = OkService::declaration();
    assert_eq!(descriptor.name(), "OkService");
    assert_eq!(descriptor.endpoint_count(), 3);
    assert_eq!(descriptor.type_markers().len(), 2);
}
