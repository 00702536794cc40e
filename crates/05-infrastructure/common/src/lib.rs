//! # Binding Common
//!
//! 声明式服务绑定的公共类型。
//!
//! ## 核心组件
//!
//! - [`MetadataMarker`] - 附加在服务类型或端点上的声明式配置
//! - [`RetryPolicy`] - 重试策略及其按字段合并规则
//! - [`ResolvedConfiguration`] - 合并后的端点配置
//! - [`ServiceSettings`] - 顶层解析调用的覆盖项
//! - [`ConfigurationError`] - 解析期错误
//!
//! 本 crate 只包含纯数据与协作者接口，解析逻辑位于 `binding-impl`。

pub mod collaborators;
pub mod configuration;
pub mod errors;
pub mod http;
pub mod markers;
pub mod retry;
pub mod settings;

pub use collaborators::*;
pub use configuration::*;
pub use errors::*;
pub use http::*;
pub use markers::*;
pub use retry::*;
pub use settings::*;
