//! # Binding Implementation
//!
//! 声明式服务绑定的具体实现：服务单例、插槽扫描、域名解析、配置合并与执行器。
//!
//! ## 主要组件
//!
//! - [`SingletonInstantiator`] - 按类型缓存的服务单例
//! - [`DescriptorSlotScanner`] - 基于描述符的插槽扫描器
//! - [`DomainResolver`] - 基础地址解析与 `${name}` 占位符替换
//! - [`ConfigurationMerger`] - 类型级与端点级元数据合并
//! - [`DefaultExecutorFactory`] - 按插槽种类构建执行器
//! - [`ReqwestTransport`] - 基于 reqwest 的网络传输

pub mod domain;
pub mod executors;
pub mod factory;
pub mod instantiator;
pub mod merger;
pub mod scanner;
pub mod transport;

pub use domain::*;
pub use executors::*;
pub use factory::*;
pub use instantiator::*;
pub use merger::*;
pub use scanner::*;
pub use transport::*;
