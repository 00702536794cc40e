//! 结构化数据执行器

use super::invoker::HttpInvoker;
use async_trait::async_trait;
use binding_abstractions::{ExecutorKind, RequestExecutor};
use binding_common::{InvocationResult, RequestArgs, ResolvedConfiguration, RestResponse};

/// 数据执行器默认内容类型
pub const DATA_CONTENT_TYPE: &str = "application/json";

/// 结构化数据执行器
///
/// 请求默认接受 JSON，响应通过 [`RequestExecutor::invoke_value`] 解码
#[derive(Debug, Clone)]
pub struct DataExecutor {
    invoker: HttpInvoker,
}

impl DataExecutor {
    pub fn new(invoker: HttpInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl RequestExecutor for DataExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Data
    }

    fn configuration(&self) -> &ResolvedConfiguration {
        self.invoker.configuration()
    }

    async fn invoke(&self, args: RequestArgs) -> InvocationResult<RestResponse> {
        let method = self.configuration().method;
        let mut request = self.invoker.prepare(method, args, Some(DATA_CONTENT_TYPE))?;
        if request.header("accept").is_none() {
            request
                .headers
                .push(("Accept".to_string(), DATA_CONTENT_TYPE.to_string()));
        }
        self.invoker.execute(request).await
    }
}
