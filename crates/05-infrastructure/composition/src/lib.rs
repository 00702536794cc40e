//! # 服务绑定组合层
//!
//! 把设置注册表、服务单例、插槽扫描、域名解析、配置合并与执行器工厂组合为
//! 顶层解析入口 [`ServiceBinder`]。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use binding_abstractions::{RestMethod, ServiceDeclaration, ServiceDescriptor};
//! use binding_common::MetadataMarker;
//!
//! #[derive(Default)]
//! struct UserService {
//!     get_user: RestMethod,
//! }
//!
//! impl ServiceDeclaration for UserService {
//!     fn declaration() -> ServiceDescriptor<Self> {
//!         ServiceDescriptor::<Self>::builder("UserService")
//!             .type_marker(MetadataMarker::domain("https://${user_host}"))
//!             .default_constructor()
//!             .endpoint("get_user", |s| &s.get_user, [MetadataMarker::get("/users/{id}")])
//!             .build()
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = binding_composition::init::<UserService>()?;
//!     println!("{:?}", service.get_user.configuration());
//!     Ok(())
//! }
//! ```

pub mod binder;
pub mod builder;
pub mod global;

pub use binder::ServiceBinder;
pub use builder::{LoggingConfig, ServiceBinderBuilder};
pub use global::{init, init_with_auth, init_with_domain, init_with_settings, init_with_spec};

// 重新导出错误类型
pub use binding_common::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
mod tests;
