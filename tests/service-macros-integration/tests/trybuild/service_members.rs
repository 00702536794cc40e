use binding_abstractions::{RestMethod, ServiceDeclaration};
use service_macros::Service;

#[derive(Default, Service)]
#[service(name = "Renamed")]
struct WithMembers {
    #[endpoint(post = "/orders", ignore_retry)]
    submit: RestMethod,

    label: String,
    count: u32,
}

fn main() {
    let descriptor = WithMembers::declaration();
    assert_eq!(descriptor.name(), "Renamed");
    assert_eq!(descriptor.members().len(), 3);
    assert_eq!(descriptor.endpoint_count(), 1);
}
