//! 域名查找与全局设置注册表接口

use crate::pre_init::PreInitAction;
use crate::provider::SettingsProvider;
use binding_common::{ConfigurationResult, SettingsResult};
use std::sync::Arc;

/// 全局默认域名的设置键
pub const DEFAULT_DOMAIN_KEY: &str = "domain";

/// 域名查找
///
/// 用于 `${name}` 占位符替换与全局默认域名
pub trait DomainLookup: Send + Sync {
    /// 获取全局默认域名
    fn default_domain(&self) -> SettingsResult<String>;

    /// 按名称获取域名
    fn domain(&self, name: &str) -> SettingsResult<String>;
}

/// 全局设置注册表
pub trait SettingsRegistry: DomainLookup {
    /// 执行预初始化动作
    ///
    /// 幂等：初始化成功后再次调用不做任何事
    fn pre_init(&self) -> ConfigurationResult<()>;

    /// 预初始化是否已完成
    fn is_initialized(&self) -> bool;

    /// 追加预初始化动作，按添加顺序执行
    fn register_pre_init(&self, action: PreInitAction);

    /// 注册设置提供者
    fn register_provider(&self, provider: Arc<dyn SettingsProvider>);

    /// 清除初始化标记（仅供测试隔离使用）
    fn reset(&self);
}
