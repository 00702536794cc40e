//! 服务实例化抽象接口

use crate::descriptor::{ServiceDeclaration, ServiceDescriptor};
use binding_common::ConfigurationResult;
use std::sync::Arc;

/// 服务实例化器 trait
///
/// 每种服务类型在进程内只创建一个实例
pub trait ServiceInstantiator: Send + Sync {
    /// 获取或创建服务单例
    ///
    /// 同一类型的并发调用不得创建出两个实例
    fn get_or_create<S: ServiceDeclaration>(
        &self,
        descriptor: &ServiceDescriptor<S>,
    ) -> ConfigurationResult<Arc<S>>;

    /// 是否已存在该类型的实例
    fn contains<S: ServiceDeclaration>(&self) -> bool;

    /// 清除所有缓存的实例（仅供测试隔离使用）
    fn clear(&self);
}
