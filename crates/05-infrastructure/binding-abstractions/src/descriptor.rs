//! 服务描述符
//!
//! 服务类型在编译期静态登记自己的端点插槽与元数据标记，
//! 解析时按描述符而不是运行时反射来发现插槽。

use crate::slot::EndpointSlot;
use binding_common::MetadataMarker;
use std::fmt;

/// 服务类型的静态声明
///
/// 通常由 `#[derive(Service)]` 生成，也可以手工实现
pub trait ServiceDeclaration: Sized + Send + Sync + 'static {
    /// 构建服务描述符
    fn declaration() -> ServiceDescriptor<Self>;
}

/// 实例插槽访问器
pub type SlotAccessor<S> = fn(&S) -> &dyn EndpointSlot;

/// 插槽访问方式
pub enum SlotAccess<S> {
    /// 服务单例上的插槽
    Instance(SlotAccessor<S>),
    /// 进程级静态插槽，整个进程只写入一处
    Static(&'static dyn EndpointSlot),
}

impl<S> SlotAccess<S> {
    /// 获取插槽
    pub fn resolve<'a>(&self, instance: &'a S) -> &'a dyn EndpointSlot {
        match self {
            SlotAccess::Instance(accessor) => accessor(instance),
            SlotAccess::Static(slot) => *slot,
        }
    }

    /// 是否为静态插槽
    pub fn is_static(&self) -> bool {
        matches!(self, SlotAccess::Static(_))
    }
}

impl<S> Clone for SlotAccess<S> {
    fn clone(&self) -> Self {
        match self {
            SlotAccess::Instance(accessor) => SlotAccess::Instance(*accessor),
            SlotAccess::Static(slot) => SlotAccess::Static(*slot),
        }
    }
}

/// 成员种类
pub enum MemberKind<S> {
    /// 端点插槽
    Endpoint(SlotAccess<S>),
    /// 其他成员，扫描时跳过
    Other {
        /// 声明的类型名称
        type_name: &'static str,
    },
}

/// 成员描述
pub struct MemberDescriptor<S> {
    pub name: String,
    pub kind: MemberKind<S>,
    pub markers: Vec<MetadataMarker>,
}

impl<S> MemberDescriptor<S> {
    /// 是否为端点插槽
    pub fn is_endpoint(&self) -> bool {
        matches!(self.kind, MemberKind::Endpoint(_))
    }
}

impl<S> fmt::Debug for MemberDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            MemberKind::Endpoint(access) if access.is_static() => "static endpoint",
            MemberKind::Endpoint(_) => "endpoint",
            MemberKind::Other { type_name } => type_name,
        };
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &kind)
            .field("markers", &self.markers)
            .finish()
    }
}

/// 服务描述符
pub struct ServiceDescriptor<S> {
    name: String,
    type_markers: Vec<MetadataMarker>,
    members: Vec<MemberDescriptor<S>>,
    constructor: Option<fn() -> S>,
}

impl<S> ServiceDescriptor<S> {
    /// 创建描述符构建器
    pub fn builder(name: impl Into<String>) -> ServiceDescriptorBuilder<S> {
        ServiceDescriptorBuilder {
            descriptor: ServiceDescriptor {
                name: name.into(),
                type_markers: Vec::new(),
                members: Vec::new(),
                constructor: None,
            },
        }
    }

    /// 服务类型名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 类型级元数据标记
    pub fn type_markers(&self) -> &[MetadataMarker] {
        &self.type_markers
    }

    /// 按声明顺序排列的成员
    pub fn members(&self) -> &[MemberDescriptor<S>] {
        &self.members
    }

    /// 无参构造
    pub fn constructor(&self) -> Option<fn() -> S> {
        self.constructor
    }

    /// 端点插槽数量
    pub fn endpoint_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_endpoint()).count()
    }
}

impl<S> fmt::Debug for ServiceDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("type_markers", &self.type_markers)
            .field("members", &self.members)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// 服务描述符构建器
pub struct ServiceDescriptorBuilder<S> {
    descriptor: ServiceDescriptor<S>,
}

impl<S> ServiceDescriptorBuilder<S> {
    /// 添加类型级标记
    pub fn type_marker(mut self, marker: MetadataMarker) -> Self {
        self.descriptor.type_markers.push(marker);
        self
    }

    /// 批量添加类型级标记
    pub fn type_markers<I>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = MetadataMarker>,
    {
        self.descriptor.type_markers.extend(markers);
        self
    }

    /// 指定无参构造
    pub fn constructor(mut self, constructor: fn() -> S) -> Self {
        self.descriptor.constructor = Some(constructor);
        self
    }

    /// 添加实例端点插槽
    pub fn endpoint<I>(mut self, name: impl Into<String>, accessor: SlotAccessor<S>, markers: I) -> Self
    where
        I: IntoIterator<Item = MetadataMarker>,
    {
        self.descriptor.members.push(MemberDescriptor {
            name: name.into(),
            kind: MemberKind::Endpoint(SlotAccess::Instance(accessor)),
            markers: markers.into_iter().collect(),
        });
        self
    }

    /// 添加进程级静态端点插槽
    pub fn static_endpoint<I>(
        mut self,
        name: impl Into<String>,
        slot: &'static dyn EndpointSlot,
        markers: I,
    ) -> Self
    where
        I: IntoIterator<Item = MetadataMarker>,
    {
        self.descriptor.members.push(MemberDescriptor {
            name: name.into(),
            kind: MemberKind::Endpoint(SlotAccess::Static(slot)),
            markers: markers.into_iter().collect(),
        });
        self
    }

    /// 添加非端点成员
    pub fn member(mut self, name: impl Into<String>, type_name: &'static str) -> Self {
        self.descriptor.members.push(MemberDescriptor {
            name: name.into(),
            kind: MemberKind::Other { type_name },
            markers: Vec::new(),
        });
        self
    }

    pub fn build(self) -> ServiceDescriptor<S> {
        self.descriptor
    }
}

impl<S: Default> ServiceDescriptorBuilder<S> {
    /// 使用 `Default::default` 作为无参构造
    pub fn default_constructor(self) -> Self {
        self.constructor(S::default)
    }
}
