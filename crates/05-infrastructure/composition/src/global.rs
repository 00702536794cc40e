//! 进程级绑定器与便捷解析入口

use crate::binder::ServiceBinder;
use binding_abstractions::ServiceDeclaration;
use binding_common::{
    AuthenticationScheme, ConfigurationResult, RequestSpecification, ServiceSettings,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

static GLOBAL_BINDER: Lazy<ServiceBinder> = Lazy::new(ServiceBinder::with_defaults);

impl ServiceBinder {
    /// 进程级绑定器，首次使用时创建
    pub fn global() -> &'static ServiceBinder {
        &GLOBAL_BINDER
    }

    /// 重置进程级绑定器（仅供测试隔离使用）
    pub fn reset_global() {
        GLOBAL_BINDER.reset();
    }
}

/// 使用默认设置解析服务
pub fn init<S: ServiceDeclaration>() -> ConfigurationResult<Arc<S>> {
    ServiceBinder::global().resolve_default()
}

/// 使用域名覆盖解析服务
pub fn init_with_domain<S: ServiceDeclaration>(
    domain: impl Into<String>,
) -> ConfigurationResult<Arc<S>> {
    ServiceBinder::global().resolve_with_domain(domain)
}

/// 使用请求规范解析服务
pub fn init_with_spec<S: ServiceDeclaration>(
    specification: RequestSpecification,
) -> ConfigurationResult<Arc<S>> {
    ServiceBinder::global().resolve_with_spec(specification)
}

/// 使用认证方案解析服务
pub fn init_with_auth<S: ServiceDeclaration>(
    scheme: Arc<dyn AuthenticationScheme>,
) -> ConfigurationResult<Arc<S>> {
    ServiceBinder::global().resolve_with_auth(scheme)
}

/// 使用完整设置解析服务
pub fn init_with_settings<S: ServiceDeclaration>(
    settings: &ServiceSettings,
) -> ConfigurationResult<Arc<S>> {
    ServiceBinder::global().resolve(settings)
}
