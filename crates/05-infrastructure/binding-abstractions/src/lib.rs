//! # Binding Abstractions
//!
//! 声明式服务绑定的抽象层，定义服务描述符、端点插槽与执行器的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceDeclaration`] - 服务类型的静态声明
//! - [`EndpointSlot`] - 可被赋予执行器的端点插槽
//! - [`RequestExecutor`] - 已配置的请求执行器
//! - [`ServiceInstantiator`] - 服务单例创建接口
//! - [`SlotScanner`] - 端点插槽扫描接口
//! - [`ExecutorFactory`] - 执行器工厂接口
//! - [`Transport`] - 网络传输接口

pub mod descriptor;
pub mod executor;
pub mod instantiator;
pub mod scanner;
pub mod slot;
pub mod transport;

pub use descriptor::*;
pub use executor::*;
pub use instantiator::*;
pub use scanner::*;
pub use slot::*;
pub use transport::*;
