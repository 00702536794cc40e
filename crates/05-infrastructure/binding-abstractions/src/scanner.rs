//! 端点插槽扫描抽象接口

use crate::descriptor::ServiceDescriptor;
use crate::slot::{EndpointSlot, ExecutorKind};
use binding_common::MetadataMarker;
use std::fmt;

/// 扫描得到的端点插槽
pub struct ScannedSlot<'a> {
    /// 成员名称
    pub name: &'a str,
    /// 插槽上的元数据标记
    pub markers: &'a [MetadataMarker],
    /// 插槽本身
    pub slot: &'a dyn EndpointSlot,
    /// 是否为进程级静态插槽
    pub is_static: bool,
}

impl ScannedSlot<'_> {
    /// 插槽声明的执行器种类
    pub fn kind(&self) -> ExecutorKind {
        self.slot.kind()
    }
}

impl fmt::Debug for ScannedSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannedSlot")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("markers", &self.markers.len())
            .field("is_static", &self.is_static)
            .finish()
    }
}

/// 端点插槽扫描器 trait
pub trait SlotScanner: Send + Sync {
    /// 按声明顺序列出服务类型的全部端点插槽
    fn scan<'a, S>(
        &self,
        descriptor: &'a ServiceDescriptor<S>,
        instance: &'a S,
    ) -> Vec<ScannedSlot<'a>>;
}
