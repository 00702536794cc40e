//! 服务绑定器构建器

use crate::binder::ServiceBinder;
use binding_abstractions::{ExecutorFactory, Transport};
use binding_common::{SettingsError, SettingsResult};
use binding_impl::DefaultExecutorFactory;
use settings_abstractions::{PreInitAction, SettingsProvider, SettingsRegistry};
use settings_impl::{
    EnvironmentSettingsProvider, GlobalSettings, JsonSettingsProvider, TomlSettingsProvider,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 服务绑定器构建器
///
/// 使用建造者模式组装设置来源、预初始化动作、传输与日志
pub struct ServiceBinderBuilder {
    /// 设置提供者列表
    providers: Vec<Arc<dyn SettingsProvider>>,
    /// 额外的预初始化动作
    pre_init_actions: Vec<PreInitAction>,
    /// 默认设置文件所在目录
    http_settings_dir: Option<PathBuf>,
    /// 执行器工厂
    factory: Option<Arc<dyn ExecutorFactory>>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ServiceBinderBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            pre_init_actions: Vec::new(),
            http_settings_dir: None,
            factory: None,
            logging_enabled: false, // 默认不初始化日志
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加 TOML 设置文件
    pub fn add_settings_toml<P: AsRef<Path>>(mut self, path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        ensure_exists(path)?;

        info!("添加 TOML 设置文件: {}", path.display());
        self.providers
            .push(Arc::new(TomlSettingsProvider::new(path)?));
        Ok(self)
    }

    /// 添加 JSON 设置文件
    pub fn add_settings_json<P: AsRef<Path>>(mut self, path: P) -> SettingsResult<Self> {
        let path = path.as_ref();
        ensure_exists(path)?;

        info!("添加 JSON 设置文件: {}", path.display());
        self.providers
            .push(Arc::new(JsonSettingsProvider::new(path)?));
        Ok(self)
    }

    /// 添加环境变量设置源
    pub fn add_settings_env_vars(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量设置源，前缀: {}", prefix);
        self.providers
            .push(Arc::new(EnvironmentSettingsProvider::new(prefix)));
        self
    }

    /// 添加自定义设置提供者
    pub fn add_settings_provider<T: SettingsProvider + 'static>(mut self, provider: T) -> Self {
        info!("添加自定义设置提供者: {}", provider.name());
        self.providers.push(Arc::new(provider));
        self
    }

    /// 在首次解析前从指定目录加载 `http-settings.toml` / `http-settings.json` 与环境变量
    pub fn with_http_settings_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.http_settings_dir = Some(dir.into());
        self
    }

    /// 追加预初始化动作
    pub fn add_pre_init(mut self, action: PreInitAction) -> Self {
        debug!("添加预初始化动作: {}", action.name());
        self.pre_init_actions.push(action);
        self
    }

    /// 使用指定传输构建默认执行器工厂
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        info!("使用传输: {}", transport.name());
        self.factory = Some(Arc::new(DefaultExecutorFactory::new(transport)));
        self
    }

    /// 使用自定义执行器工厂
    pub fn with_executor_factory(mut self, factory: Arc<dyn ExecutorFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建绑定器
    pub fn build(self) -> ServiceBinder {
        // 只有在明确配置了日志时才初始化，避免测试中重复初始化
        if self.logging_enabled {
            self.logging_config.init();
        }

        let settings = GlobalSettings::new();
        for provider in self.providers {
            settings.register_provider(provider);
        }
        if let Some(dir) = &self.http_settings_dir {
            settings.register_pre_init(settings.http_settings_action(dir));
        }
        for action in self.pre_init_actions {
            settings.register_pre_init(action);
        }

        let factory = self
            .factory
            .unwrap_or_else(|| Arc::new(DefaultExecutorFactory::default()) as Arc<dyn ExecutorFactory>);

        info!(
            "服务绑定器构建完成，{} 个设置提供者，预初始化动作: {:?}",
            settings.provider_count(),
            settings.pre_init_actions()
        );
        ServiceBinder::new(Arc::new(settings), factory)
    }
}

impl Default for ServiceBinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_exists(path: &Path) -> SettingsResult<()> {
    if path.exists() {
        return Ok(());
    }
    Err(SettingsError::FileReadError {
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("设置文件不存在: {}", path.display()),
        ),
    })
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 初始化全局日志订阅者
    ///
    /// 已存在订阅者时返回 `false`，不视为错误
    pub fn init(&self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        let initialized = if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .is_ok();

        if initialized {
            info!("日志系统初始化完成");
        } else {
            debug!("日志系统已初始化，跳过");
        }
        initialized
    }
}
