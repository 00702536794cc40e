//! 解析后的端点配置

use crate::collaborators::{AuthenticationScheme, ErrorHandler, RequestSpecification, ResponseDecoder};
use crate::markers::{
    HeaderMarker, HttpMethod, MultiPartMarker, ParameterMarker, ProxyMarker, TrustStoreMarker,
};
use crate::retry::RetryPolicy;
use crate::settings::ServiceSettings;
use std::sync::Arc;

/// 合并后的 Cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCookie {
    pub name: String,
    pub value: Option<String>,
    pub additional_values: Vec<String>,
}

impl ResolvedCookie {
    /// 只有名称、没有取值的 Cookie
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            additional_values: Vec::new(),
        }
    }

    /// 名称与取值
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            additional_values: Vec::new(),
        }
    }

    /// 名称、取值与附加取值
    pub fn with_values(
        name: impl Into<String>,
        value: impl Into<String>,
        additional_values: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            additional_values,
        }
    }

    /// `Cookie` 请求头中的片段，附加取值以同名条目追加
    pub fn to_header_part(&self) -> String {
        let Some(value) = &self.value else {
            return self.name.clone();
        };

        std::iter::once(value)
            .chain(self.additional_values.iter())
            .map(|v| format!("{}={}", self.name, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// 合并后的端点元数据
///
/// 请求头、Cookie、查询参数、表单参数与多部分文件按追加顺序保留；
/// 内容类型、代理与信任证书以最后写入者为准。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointMetadata {
    pub headers: Vec<HeaderMarker>,
    pub cookies: Vec<ResolvedCookie>,
    pub query_params: Vec<ParameterMarker>,
    pub form_params: Vec<ParameterMarker>,
    pub multipart: Vec<MultiPartMarker>,
    pub content_type: Option<String>,
    pub proxy: Option<ProxyMarker>,
    pub trust_store: Option<TrustStoreMarker>,
    pub retry: Option<RetryPolicy>,
}

impl EndpointMetadata {
    /// 按名称查找请求头的全部取值
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }
}

/// 解析后的端点配置
///
/// 用于构建请求执行器的最终快照，构建后不再修改
#[derive(Debug, Clone)]
pub struct ResolvedConfiguration {
    /// 所属服务名称
    pub service: String,
    /// 端点名称
    pub slot: String,
    pub method: HttpMethod,
    /// 端点路径，未声明方法标记时为空
    pub path: Option<String>,
    /// 基础地址，未配置任何域名时为空
    pub base_url: Option<String>,
    pub metadata: EndpointMetadata,
    pub request_specification: Option<RequestSpecification>,
    pub response_decoder: Arc<dyn ResponseDecoder>,
    pub error_handler: Arc<dyn ErrorHandler>,
    pub authentication_scheme: Option<Arc<dyn AuthenticationScheme>>,
}

impl ResolvedConfiguration {
    /// 组合端点数据与调用方设置中的协作者
    pub fn new(
        service: impl Into<String>,
        slot: impl Into<String>,
        (method, path): (HttpMethod, Option<String>),
        base_url: Option<String>,
        metadata: EndpointMetadata,
        settings: &ServiceSettings,
    ) -> Self {
        Self {
            service: service.into(),
            slot: slot.into(),
            method,
            path,
            base_url,
            metadata,
            request_specification: settings.request_specification.clone(),
            response_decoder: Arc::clone(&settings.response_decoder),
            error_handler: Arc::clone(&settings.error_handler),
            authentication_scheme: settings.authentication_scheme.clone(),
        }
    }
}
