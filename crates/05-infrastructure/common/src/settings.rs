//! 调用方设置
//!
//! 顶层解析调用可携带的覆盖项，未设置的选项按字段回退到默认值

use crate::collaborators::{
    AuthenticationScheme, DefaultErrorHandler, ErrorHandler, JsonResponseDecoder,
    RequestSpecification, ResponseDecoder,
};
use std::sync::Arc;

/// 服务解析设置
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// 请求规范覆盖
    pub request_specification: Option<RequestSpecification>,
    /// 响应解码器
    pub response_decoder: Arc<dyn ResponseDecoder>,
    /// 错误处理器
    pub error_handler: Arc<dyn ErrorHandler>,
    /// 认证方案覆盖
    pub authentication_scheme: Option<Arc<dyn AuthenticationScheme>>,
    /// 域名覆盖，可包含 `${name}` 占位符
    pub domain: Option<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            request_specification: None,
            response_decoder: Arc::new(JsonResponseDecoder),
            error_handler: Arc::new(DefaultErrorHandler),
            authentication_scheme: None,
            domain: None,
        }
    }
}

impl ServiceSettings {
    /// 创建设置构建器
    pub fn builder() -> ServiceSettingsBuilder {
        ServiceSettingsBuilder::default()
    }

    /// 仅覆盖域名
    pub fn with_domain(domain: impl Into<String>) -> Self {
        Self::builder().domain(domain).build()
    }

    /// 仅覆盖请求规范
    pub fn with_request_specification(specification: RequestSpecification) -> Self {
        Self::builder().request_specification(specification).build()
    }

    /// 仅覆盖认证方案
    pub fn with_authentication(scheme: Arc<dyn AuthenticationScheme>) -> Self {
        Self::builder().authentication_scheme(scheme).build()
    }
}

/// 设置构建器
#[derive(Debug, Default)]
pub struct ServiceSettingsBuilder {
    request_specification: Option<RequestSpecification>,
    response_decoder: Option<Arc<dyn ResponseDecoder>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    authentication_scheme: Option<Arc<dyn AuthenticationScheme>>,
    domain: Option<String>,
}

impl ServiceSettingsBuilder {
    pub fn request_specification(mut self, specification: RequestSpecification) -> Self {
        self.request_specification = Some(specification);
        self
    }

    pub fn response_decoder(mut self, decoder: Arc<dyn ResponseDecoder>) -> Self {
        self.response_decoder = Some(decoder);
        self
    }

    pub fn error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub fn authentication_scheme(mut self, scheme: Arc<dyn AuthenticationScheme>) -> Self {
        self.authentication_scheme = Some(scheme);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// 构建设置，未指定的字段使用默认值
    pub fn build(self) -> ServiceSettings {
        let defaults = ServiceSettings::default();
        let settings = ServiceSettings {
            request_specification: self.request_specification,
            response_decoder: self.response_decoder.unwrap_or(defaults.response_decoder),
            error_handler: self.error_handler.unwrap_or(defaults.error_handler),
            authentication_scheme: self.authentication_scheme,
            domain: self.domain,
        };

        tracing::debug!(
            "构建服务设置: domain={:?}, auth={:?}",
            settings.domain,
            settings.authentication_scheme.as_ref().map(|s| s.name().to_string())
        );
        settings
    }
}
