//! 网络传输抽象接口

use async_trait::async_trait;
use binding_common::{PreparedRequest, RawResponse, TransportError};
use std::fmt::Debug;

/// 网络传输 trait
///
/// 执行器通过此接口发送请求，解析引擎本身不进行任何网络 I/O
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// 发送请求并返回原始响应
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError>;

    /// 传输实现名称
    fn name(&self) -> &str;
}
