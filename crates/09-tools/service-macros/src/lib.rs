//! # Service Macros
//!
//! 这个 crate 提供从属性生成服务描述符的派生宏。
//!
//! ## 核心宏
//!
//! - [`Service`] - 为结构体实现 `ServiceDeclaration`
//!
//! 生成的代码引用 `binding_common` 与 `binding_abstractions`，使用方需要同时依赖这两个 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use binding_abstractions::{DataMethod, RestMethod};
//! use service_macros::Service;
//!
//! #[derive(Default, Service)]
//! #[service(domain = "https://${user_host}", header("X-Client", "demo"))]
//! pub struct UserService {
//!     #[endpoint(get = "/users", query("page", "1"))]
//!     list_users: RestMethod,
//!
//!     #[endpoint(get = "/users/{id}", ignore_retry)]
//!     get_user: DataMethod,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod markers;
mod service;

/// 服务声明派生宏
///
/// 自动为结构体实现 `ServiceDeclaration`，按字段声明顺序登记端点插槽。
///
/// # 结构体属性 `#[service(...)]`
///
/// - `name = "..."` - 服务名称（默认为结构体名）
/// - `domain = "..."` - 服务域名，可包含一个 `${name}` 占位符
/// - `header(name, value)`、`cookie(name, value, additional = [..])`
/// - `query(name, value)`、`form(name, value)`、`content_type = "..."`
/// - `proxy(scheme, host, port)`、`trust_store(path, password)`
/// - `retry(max_attempts = N, delay_ms = N, trigger = path::to::fn)`
///
/// # 字段属性 `#[endpoint(...)]`
///
/// - `get|post|put|delete|patch|head|options = "/path"`、`url = "..."`
/// - 与结构体属性相同的请求头、Cookie、参数、代理、证书与重试标记
/// - `ignore_retry`、`multipart(control_name, file_name, file_path, mime_type)`
///
/// 类型为 `RestMethod`、`SoapMethod`、`DataMethod` 的字段是端点插槽，
/// 其余字段登记为普通成员。结构体需要实现 `Default`。
#[proc_macro_derive(Service, attributes(service, endpoint))]
pub fn derive_service(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    service::derive_service_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
