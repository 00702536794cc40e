//! 执行器工厂

use crate::executors::{DataExecutor, HttpInvoker, RestExecutor, SoapExecutor};
use crate::transport::ReqwestTransport;
use binding_abstractions::{ExecutorFactory, ExecutorKind, RequestExecutor, Transport};
use binding_common::ResolvedConfiguration;
use std::sync::Arc;
use tracing::debug;

/// 默认执行器工厂
///
/// 所有执行器共享同一个传输实现
#[derive(Debug, Clone)]
pub struct DefaultExecutorFactory {
    transport: Arc<dyn Transport>,
}

impl Default for DefaultExecutorFactory {
    fn default() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }
}

impl DefaultExecutorFactory {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}

impl ExecutorFactory for DefaultExecutorFactory {
    fn build(
        &self,
        kind: ExecutorKind,
        configuration: ResolvedConfiguration,
    ) -> Arc<dyn RequestExecutor> {
        debug!(
            "构建 {} 执行器: {}.{}, 传输: {}",
            kind,
            configuration.service,
            configuration.slot,
            self.transport.name()
        );

        let invoker = HttpInvoker::new(configuration, Arc::clone(&self.transport));
        match kind {
            ExecutorKind::Rest => Arc::new(RestExecutor::new(invoker)),
            ExecutorKind::Soap => Arc::new(SoapExecutor::new(invoker)),
            ExecutorKind::Data => Arc::new(DataExecutor::new(invoker)),
        }
    }
}
