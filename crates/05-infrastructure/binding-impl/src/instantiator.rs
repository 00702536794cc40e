//! 服务单例实例化器

use binding_abstractions::{ServiceDeclaration, ServiceDescriptor, ServiceInstantiator};
use binding_common::{ConfigurationError, ConfigurationResult};
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{debug, info};

type Instance = Arc<dyn Any + Send + Sync>;

/// 按类型缓存的服务单例
///
/// 每种类型持有独立的 [`OnceCell`]，同一类型的并发创建被串行化，
/// 不同类型之间互不阻塞。
#[derive(Debug, Default)]
pub struct SingletonInstantiator {
    instances: DashMap<TypeId, Arc<OnceCell<Instance>>>,
}

impl SingletonInstantiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已创建的单例数量
    pub fn len(&self) -> usize {
        self.instances
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, type_id: TypeId) -> Arc<OnceCell<Instance>> {
        // 先克隆出单元再初始化，避免在分片锁内执行构造
        Arc::clone(self.instances.entry(type_id).or_default().value())
    }
}

impl ServiceInstantiator for SingletonInstantiator {
    fn get_or_create<S: ServiceDeclaration>(
        &self,
        descriptor: &ServiceDescriptor<S>,
    ) -> ConfigurationResult<Arc<S>> {
        let cell = self.cell_for(TypeId::of::<S>());

        let instance = cell.get_or_try_init(|| {
            let constructor =
                descriptor
                    .constructor()
                    .ok_or_else(|| ConfigurationError::InstantiationFailed {
                        type_name: descriptor.name().to_string(),
                    })?;

            info!("创建服务单例: {}", descriptor.name());
            Ok::<Instance, ConfigurationError>(Arc::new(constructor()))
        })?;

        debug!("获取服务单例: {}", descriptor.name());
        Arc::clone(instance)
            .downcast::<S>()
            .map_err(|_| ConfigurationError::InstantiationFailed {
                type_name: descriptor.name().to_string(),
            })
    }

    fn contains<S: ServiceDeclaration>(&self) -> bool {
        self.instances
            .get(&TypeId::of::<S>())
            .map_or(false, |cell| cell.get().is_some())
    }

    fn clear(&self) {
        info!("清除 {} 个服务单例", self.len());
        self.instances.clear();
    }
}
