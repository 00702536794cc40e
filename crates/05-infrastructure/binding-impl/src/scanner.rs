//! 基于描述符的插槽扫描器

use binding_abstractions::{MemberKind, ScannedSlot, ServiceDescriptor, SlotScanner};
use tracing::debug;

/// 基于描述符的插槽扫描器
///
/// 按声明顺序返回所有端点插槽，非端点成员被跳过。
/// 仅扫描服务类型自身声明的成员。
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorSlotScanner;

impl DescriptorSlotScanner {
    pub fn new() -> Self {
        Self
    }
}

impl SlotScanner for DescriptorSlotScanner {
    fn scan<'a, S>(
        &self,
        descriptor: &'a ServiceDescriptor<S>,
        instance: &'a S,
    ) -> Vec<ScannedSlot<'a>> {
        let slots: Vec<ScannedSlot<'a>> = descriptor
            .members()
            .iter()
            .filter_map(|member| match &member.kind {
                MemberKind::Endpoint(access) => Some(ScannedSlot {
                    name: member.name.as_str(),
                    markers: member.markers.as_slice(),
                    slot: access.resolve(instance),
                    is_static: access.is_static(),
                }),
                MemberKind::Other { type_name } => {
                    debug!("跳过非端点成员: {} ({})", member.name, type_name);
                    None
                }
            })
            .collect();

        debug!("服务 {} 扫描到 {} 个端点", descriptor.name(), slots.len());
        slots
    }
}
