//! 服务绑定器

use binding_abstractions::{
    ExecutorFactory, ScannedSlot, ServiceDeclaration, ServiceDescriptor, ServiceInstantiator,
    SlotScanner,
};
use binding_common::{
    AuthenticationScheme, ConfigurationError, ConfigurationResult, RequestSpecification,
    ResolvedConfiguration, ServiceSettings,
};
use binding_impl::{
    ConfigurationMerger, DefaultExecutorFactory, DescriptorSlotScanner, DomainResolver,
    SingletonInstantiator,
};
use settings_abstractions::SettingsRegistry;
use settings_impl::GlobalSettings;
use std::sync::Arc;
use tracing::{debug, debug_span, info, info_span};

/// 服务绑定器
///
/// 把服务类型的声明解析为已配置执行器的单例：
/// 预初始化、获取单例、扫描插槽，再逐个插槽解析方法、地址与元数据并写入执行器。
/// 解析过程不进行网络 I/O。
pub struct ServiceBinder {
    settings: Arc<GlobalSettings>,
    instantiator: SingletonInstantiator,
    scanner: DescriptorSlotScanner,
    merger: ConfigurationMerger,
    domains: DomainResolver,
    factory: Arc<dyn ExecutorFactory>,
}

impl std::fmt::Debug for ServiceBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBinder")
            .field("settings", &self.settings)
            .field("instances", &self.instantiator.len())
            .finish_non_exhaustive()
    }
}

impl ServiceBinder {
    /// 使用给定的设置注册表与执行器工厂创建绑定器
    pub fn new(settings: Arc<GlobalSettings>, factory: Arc<dyn ExecutorFactory>) -> Self {
        let domains = DomainResolver::new(Arc::clone(&settings) as _);
        Self {
            settings,
            instantiator: SingletonInstantiator::new(),
            scanner: DescriptorSlotScanner::new(),
            merger: ConfigurationMerger::new(),
            domains,
            factory,
        }
    }

    /// 默认绑定器：加载 HTTP 设置文件与环境变量，使用 reqwest 传输
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(GlobalSettings::with_defaults()),
            Arc::new(DefaultExecutorFactory::default()),
        )
    }

    /// 创建绑定器构建器
    pub fn builder() -> crate::builder::ServiceBinderBuilder {
        crate::builder::ServiceBinderBuilder::new()
    }

    /// 设置注册表
    pub fn settings(&self) -> &Arc<GlobalSettings> {
        &self.settings
    }

    /// 服务单例缓存
    pub fn instantiator(&self) -> &SingletonInstantiator {
        &self.instantiator
    }

    /// 解析服务类型
    ///
    /// 任一插槽失败都会终止解析并返回带插槽和服务名称的错误；
    /// 已写入的插槽保持原状，再次解析会覆盖它们。
    pub fn resolve<S: ServiceDeclaration>(
        &self,
        settings: &ServiceSettings,
    ) -> ConfigurationResult<Arc<S>> {
        let descriptor = S::declaration();
        let span = info_span!("resolve_service", service = descriptor.name());
        let _guard = span.enter();

        self.settings.pre_init()?;
        let instance = self.instantiator.get_or_create(&descriptor)?;

        let slots = self.scanner.scan(&descriptor, instance.as_ref());
        for slot in &slots {
            self.resolve_slot(&descriptor, slot, settings)
                .map_err(|e| match e {
                    ConfigurationError::SlotAssignmentFailed { .. } => e,
                    other => other.in_slot(slot.name, descriptor.name()),
                })?;
        }

        info!("服务 {} 解析完成，共 {} 个端点", descriptor.name(), slots.len());
        Ok(instance)
    }

    /// 使用默认设置解析
    pub fn resolve_default<S: ServiceDeclaration>(&self) -> ConfigurationResult<Arc<S>> {
        self.resolve(&ServiceSettings::default())
    }

    /// 使用域名覆盖解析
    pub fn resolve_with_domain<S: ServiceDeclaration>(
        &self,
        domain: impl Into<String>,
    ) -> ConfigurationResult<Arc<S>> {
        self.resolve(&ServiceSettings::with_domain(domain))
    }

    /// 使用请求规范解析
    pub fn resolve_with_spec<S: ServiceDeclaration>(
        &self,
        specification: RequestSpecification,
    ) -> ConfigurationResult<Arc<S>> {
        self.resolve(&ServiceSettings::with_request_specification(specification))
    }

    /// 使用认证方案解析
    pub fn resolve_with_auth<S: ServiceDeclaration>(
        &self,
        scheme: Arc<dyn AuthenticationScheme>,
    ) -> ConfigurationResult<Arc<S>> {
        self.resolve(&ServiceSettings::with_authentication(scheme))
    }

    /// 清除单例缓存与预初始化标记（仅供测试隔离使用）
    pub fn reset(&self) {
        info!("重置服务绑定器");
        self.instantiator.clear();
        self.settings.reset();
    }

    fn resolve_slot<S>(
        &self,
        descriptor: &ServiceDescriptor<S>,
        slot: &ScannedSlot<'_>,
        settings: &ServiceSettings,
    ) -> ConfigurationResult<()> {
        let span = debug_span!(
            "resolve_slot",
            slot = slot.name,
            kind = %slot.kind(),
            is_static = slot.is_static
        );
        let _guard = span.enter();

        let type_markers = descriptor.type_markers();
        let (method, path) = self.merger.resolve_method_and_path(slot.markers);
        let base_url =
            self.domains
                .resolve_url(slot.markers, type_markers, settings.domain.as_deref())?;
        let metadata = self.merger.merge_metadata(type_markers, slot.markers);

        debug!(
            "{}端点 {}: {} {}{}",
            if slot.is_static { "静态" } else { "" },
            slot.name,
            method,
            base_url.as_deref().unwrap_or("<无基础地址>"),
            path.as_deref().unwrap_or("")
        );

        let configuration = ResolvedConfiguration::new(
            descriptor.name(),
            slot.name,
            (method, path),
            base_url,
            metadata,
            settings,
        );
        let executor = self.factory.build(slot.kind(), configuration);

        slot.slot
            .assign(executor)
            .map_err(|e| ConfigurationError::SlotAssignmentFailed {
                slot: slot.name.to_string(),
                type_name: descriptor.name().to_string(),
                message: e.to_string(),
            })
    }
}
