//! 端点插槽
//!
//! 服务类型中声明为 [`RestMethod`]、[`SoapMethod`] 或 [`DataMethod`] 的成员即为端点插槽。
//! 插槽在解析时被赋予执行器，之后可被多个调用方并发使用；重新解析会直接覆盖旧的执行器。

use crate::executor::RequestExecutor;
use binding_common::{
    DecodeError, InvocationError, InvocationResult, RequestArgs, ResolvedConfiguration,
    RestResponse,
};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// 执行器种类，由插槽声明的类型决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutorKind {
    /// 通用 REST 执行器
    Rest,
    /// SOAP 执行器
    Soap,
    /// 结构化数据执行器
    Data,
}

impl ExecutorKind {
    /// 种类对应的插槽类型名称
    pub fn slot_type_name(self) -> &'static str {
        match self {
            ExecutorKind::Rest => "RestMethod",
            ExecutorKind::Soap => "SoapMethod",
            ExecutorKind::Data => "DataMethod",
        }
    }
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot_type_name())
    }
}

/// 插槽赋值错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("插槽类型为 {expected}，无法接收 {actual} 执行器")]
pub struct AssignmentError {
    pub expected: ExecutorKind,
    pub actual: ExecutorKind,
}

/// 端点插槽 trait
pub trait EndpointSlot: Send + Sync {
    /// 插槽声明的执行器种类
    fn kind(&self) -> ExecutorKind;

    /// 写入执行器，覆盖已有的执行器
    fn assign(&self, executor: Arc<dyn RequestExecutor>) -> Result<(), AssignmentError>;

    /// 当前执行器
    fn current(&self) -> Option<Arc<dyn RequestExecutor>>;
}

#[derive(Default)]
struct SlotCell {
    executor: RwLock<Option<Arc<dyn RequestExecutor>>>,
}

impl SlotCell {
    const fn new() -> Self {
        Self {
            executor: parking_lot::const_rwlock(None),
        }
    }

    fn assign(
        &self,
        expected: ExecutorKind,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<(), AssignmentError> {
        let actual = executor.kind();
        if actual != expected {
            return Err(AssignmentError { expected, actual });
        }

        debug!(
            "{} 插槽写入执行器: {}",
            expected,
            executor.configuration().slot
        );
        *self.executor.write() = Some(executor);
        Ok(())
    }

    fn current(&self) -> Option<Arc<dyn RequestExecutor>> {
        self.executor.read().clone()
    }

    fn require(&self, kind: ExecutorKind) -> InvocationResult<Arc<dyn RequestExecutor>> {
        self.current().ok_or_else(|| InvocationError::UnresolvedSlot {
            kind: kind.to_string(),
        })
    }
}

macro_rules! endpoint_slot {
    ($(#[$meta:meta])* $name:ident => $kind:expr) => {
        $(#[$meta])*
        #[derive(Default)]
        pub struct $name {
            cell: SlotCell,
        }

        impl $name {
            /// 创建尚未解析的插槽，可用于 `static` 声明
            pub const fn new() -> Self {
                Self {
                    cell: SlotCell::new(),
                }
            }

            /// 是否已被赋予执行器
            pub fn is_resolved(&self) -> bool {
                self.cell.current().is_some()
            }

            /// 当前执行器使用的配置快照
            pub fn configuration(&self) -> Option<ResolvedConfiguration> {
                self.cell
                    .current()
                    .map(|executor| executor.configuration().clone())
            }

            /// 发送请求
            pub async fn call(&self, args: RequestArgs) -> InvocationResult<RestResponse> {
                self.cell.require($kind)?.invoke(args).await
            }
        }

        impl EndpointSlot for $name {
            fn kind(&self) -> ExecutorKind {
                $kind
            }

            fn assign(&self, executor: Arc<dyn RequestExecutor>) -> Result<(), AssignmentError> {
                self.cell.assign($kind, executor)
            }

            fn current(&self) -> Option<Arc<dyn RequestExecutor>> {
                self.cell.current()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("resolved", &self.is_resolved())
                    .finish()
            }
        }
    };
}

endpoint_slot! {
    /// REST 端点插槽
    RestMethod => ExecutorKind::Rest
}

endpoint_slot! {
    /// SOAP 端点插槽
    SoapMethod => ExecutorKind::Soap
}

endpoint_slot! {
    /// 结构化数据端点插槽
    DataMethod => ExecutorKind::Data
}

impl SoapMethod {
    /// 以给定的消息体发送 SOAP 请求
    pub async fn call_body(&self, body: impl Into<String>) -> InvocationResult<RestResponse> {
        self.call(RequestArgs::new().body(body)).await
    }
}

impl DataMethod {
    /// 发送请求并把响应解码为 `T`
    pub async fn call_as<T: DeserializeOwned>(&self, args: RequestArgs) -> InvocationResult<T> {
        let shape = std::any::type_name::<T>();
        let value = self
            .cell
            .require(ExecutorKind::Data)?
            .invoke_value(args, shape)
            .await?;

        serde_json::from_value(value)
            .map_err(|e| InvocationError::Decode(DecodeError::new(shape, e.to_string())))
    }
}
