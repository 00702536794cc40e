//! 配置合并引擎
//!
//! 先应用服务类型级标记，再应用端点级标记：
//! 请求头、Cookie、查询参数、表单参数、多部分文件为追加；
//! 内容类型、代理、信任证书为后写覆盖；重试策略按字段合并，`IgnoreRetry` 最后生效。

use binding_common::{
    CookieMarker, EndpointMetadata, HttpMethod, MetadataMarker, ResolvedCookie, RetryMarker,
    RetryPolicy,
};
use tracing::{debug, warn};

/// 配置合并引擎
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigurationMerger;

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self
    }

    /// 解析端点的请求方法与路径
    ///
    /// 按 GET、POST、PUT、DELETE、PATCH、HEAD、OPTIONS 的顺序取第一个命中的方法标记；
    /// 没有方法标记时为 GET 且路径为空。
    pub fn resolve_method_and_path(&self, slot_markers: &[MetadataMarker]) -> (HttpMethod, Option<String>) {
        let declared: Vec<_> = slot_markers
            .iter()
            .filter_map(|marker| match marker {
                MetadataMarker::Method(method) => Some(method),
                _ => None,
            })
            .collect();

        if declared.len() > 1 {
            warn!(
                "端点声明了 {} 个方法标记，按优先级取第一个命中者",
                declared.len()
            );
        }

        HttpMethod::PRIORITY
            .iter()
            .find_map(|candidate| {
                declared
                    .iter()
                    .find(|marker| marker.method == *candidate)
                    .map(|marker| (marker.method, Some(marker.path.clone())))
            })
            .unwrap_or((HttpMethod::Get, None))
    }

    /// 合并类型级与端点级元数据
    pub fn merge_metadata(
        &self,
        type_markers: &[MetadataMarker],
        slot_markers: &[MetadataMarker],
    ) -> EndpointMetadata {
        let mut metadata = EndpointMetadata::default();

        for marker in type_markers.iter().chain(slot_markers) {
            match marker {
                MetadataMarker::Header(header) => metadata.headers.push(header.clone()),
                MetadataMarker::Cookie(cookie) => metadata.cookies.push(resolve_cookie(cookie)),
                MetadataMarker::QueryParameter(param) => metadata.query_params.push(param.clone()),
                MetadataMarker::FormParameter(param) => metadata.form_params.push(param.clone()),
                MetadataMarker::MultiPart(part) => metadata.multipart.push(part.clone()),
                MetadataMarker::ContentType(content_type) => {
                    metadata.content_type = Some(content_type.clone());
                }
                MetadataMarker::Proxy(proxy) => metadata.proxy = Some(proxy.clone()),
                MetadataMarker::TrustStore(store) => metadata.trust_store = Some(store.clone()),
                MetadataMarker::Method(_)
                | MetadataMarker::Retry(_)
                | MetadataMarker::IgnoreRetry
                | MetadataMarker::Domain(_)
                | MetadataMarker::Url(_) => {}
            }
        }

        metadata.retry = self.merge_retry(type_markers, slot_markers);
        metadata
    }

    /// 合并重试策略
    pub fn merge_retry(
        &self,
        type_markers: &[MetadataMarker],
        slot_markers: &[MetadataMarker],
    ) -> Option<RetryPolicy> {
        if slot_markers
            .iter()
            .any(|marker| matches!(marker, MetadataMarker::IgnoreRetry))
        {
            debug!("端点忽略重试策略");
            return None;
        }

        let type_policy = find_retry(type_markers).map(RetryPolicy::from_marker);

        let merged = match (type_policy, find_retry(slot_markers)) {
            (Some(policy), Some(slot)) => Some(policy.merged_with(slot)),
            (None, Some(slot)) => Some(RetryPolicy::from_marker(slot)),
            (policy, None) => policy,
        };

        if let Some(policy) = &merged {
            debug!(
                "重试策略: max_attempts={:?}, delay={:?}, trigger={:?}",
                policy.max_attempts,
                policy.delay,
                policy.trigger.as_ref().map(|t| t.name())
            );
        }
        merged
    }
}

fn find_retry(markers: &[MetadataMarker]) -> Option<&RetryMarker> {
    markers.iter().rev().find_map(|marker| match marker {
        MetadataMarker::Retry(retry) => Some(retry),
        _ => None,
    })
}

fn resolve_cookie(cookie: &CookieMarker) -> ResolvedCookie {
    if cookie.is_value_unassigned() {
        ResolvedCookie::named(&cookie.name)
    } else if cookie.are_additional_values_unassigned() {
        ResolvedCookie::with_value(&cookie.name, &cookie.value)
    } else {
        ResolvedCookie::with_values(&cookie.name, &cookie.value, cookie.additional_values.clone())
    }
}
