//! REST 执行器

use super::invoker::HttpInvoker;
use async_trait::async_trait;
use binding_abstractions::{ExecutorKind, RequestExecutor};
use binding_common::{InvocationResult, RequestArgs, ResolvedConfiguration, RestResponse};

/// 通用 REST 执行器
///
/// 使用端点解析出的请求方法，请求体原样发送
#[derive(Debug, Clone)]
pub struct RestExecutor {
    invoker: HttpInvoker,
}

impl RestExecutor {
    pub fn new(invoker: HttpInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl RequestExecutor for RestExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Rest
    }

    fn configuration(&self) -> &ResolvedConfiguration {
        self.invoker.configuration()
    }

    async fn invoke(&self, args: RequestArgs) -> InvocationResult<RestResponse> {
        let method = self.configuration().method;
        let request = self.invoker.prepare(method, args, None)?;
        self.invoker.execute(request).await
    }
}
