//! 请求执行器抽象接口

use crate::slot::ExecutorKind;
use async_trait::async_trait;
use binding_common::{InvocationResult, RequestArgs, ResolvedConfiguration, RestResponse};
use std::fmt::Debug;
use std::sync::Arc;

/// 请求执行器 trait
///
/// 执行器在构建时接收解析后的配置，之后只读，可被并发调用
#[async_trait]
pub trait RequestExecutor: Send + Sync + Debug {
    /// 执行器种类
    fn kind(&self) -> ExecutorKind;

    /// 构建时使用的配置
    fn configuration(&self) -> &ResolvedConfiguration;

    /// 发送请求
    async fn invoke(&self, args: RequestArgs) -> InvocationResult<RestResponse>;

    /// 发送请求并用配置中的响应解码器解码响应体
    async fn invoke_value(
        &self,
        args: RequestArgs,
        shape: &str,
    ) -> InvocationResult<serde_json::Value> {
        let response = self.invoke(args).await?;
        let value = self
            .configuration()
            .response_decoder
            .decode(response.raw(), shape)?;
        Ok(value)
    }
}

/// 执行器工厂 trait
///
/// 按插槽声明的种类构建执行器并注入共享的协作者
pub trait ExecutorFactory: Send + Sync {
    /// 构建执行器
    fn build(
        &self,
        kind: ExecutorKind,
        configuration: ResolvedConfiguration,
    ) -> Arc<dyn RequestExecutor>;
}
