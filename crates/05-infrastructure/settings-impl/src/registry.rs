//! 全局设置注册表实现

use binding_common::{ConfigurationError, ConfigurationResult, SettingsError, SettingsResult};
use parking_lot::{Mutex, RwLock};
use settings_abstractions::{
    DomainLookup, PreInitAction, SettingsProvider, SettingsRegistry, DEFAULT_DOMAIN_KEY,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 默认预初始化动作名称
pub const HTTP_SETTINGS_ACTION: &str = "HttpSettings";

/// 默认 TOML 设置文件名
pub const HTTP_SETTINGS_TOML: &str = "http-settings.toml";

/// 默认 JSON 设置文件名
pub const HTTP_SETTINGS_JSON: &str = "http-settings.json";

/// 默认环境变量前缀
pub const HTTP_ENV_PREFIX: &str = "HTTP_";

type ProviderList = Arc<RwLock<Vec<Arc<dyn SettingsProvider>>>>;

#[derive(Debug, Default)]
struct PreInitState {
    initialized: bool,
    actions: Vec<PreInitAction>,
}

/// 全局设置注册表
///
/// 持有按优先级排序的设置提供者以及按添加顺序执行的预初始化动作。
/// 预初始化在互斥锁内执行，动作内部不得再次调用 [`SettingsRegistry::pre_init`]。
#[derive(Debug, Default)]
pub struct GlobalSettings {
    /// 设置提供者列表（按优先级排序）
    providers: ProviderList,
    pre_init: Mutex<PreInitState>,
}

impl GlobalSettings {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带默认预初始化动作的注册表
    ///
    /// 默认动作从当前工作目录加载 `http-settings.toml` / `http-settings.json`
    /// 以及 `HTTP_` 前缀的环境变量
    pub fn with_defaults() -> Self {
        let settings = Self::new();
        settings.register_pre_init(settings.http_settings_action("."));
        settings
    }

    /// 创建从指定目录加载设置文件的默认动作
    pub fn http_settings_action(&self, dir: impl AsRef<Path>) -> PreInitAction {
        let providers = Arc::clone(&self.providers);
        let dir = dir.as_ref().to_path_buf();
        // 上一次加载的提供者，重新执行时整体替换
        let loaded: Mutex<Vec<Arc<dyn SettingsProvider>>> = Mutex::new(Vec::new());

        PreInitAction::new(HTTP_SETTINGS_ACTION, move || {
            let fresh = load_http_settings(&dir)?;
            let mut previous = loaded.lock();
            replace_providers(&providers, &previous, &fresh);
            *previous = fresh;
            Ok(())
        })
    }

    /// 获取设置提供者数量
    pub fn provider_count(&self) -> usize {
        self.providers.read().len()
    }

    /// 获取已注册的预初始化动作名称
    pub fn pre_init_actions(&self) -> Vec<String> {
        self.pre_init
            .lock()
            .actions
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// 按优先级顺序查找字符串设置
    pub fn get_string(&self, key: &str) -> SettingsResult<String> {
        for provider in self.providers.read().iter() {
            match provider.get_string(key) {
                Ok(value) => {
                    debug!("从提供者 {} 获取设置: {}", provider.name(), key);
                    return Ok(value);
                }
                Err(SettingsError::KeyNotFound { .. }) => continue,
                Err(e) => {
                    warn!("提供者 {} 读取设置 {} 失败: {}", provider.name(), key, e);
                    return Err(e);
                }
            }
        }

        Err(SettingsError::KeyNotFound {
            key: key.to_string(),
        })
    }
}

fn insert_provider(providers: &ProviderList, provider: Arc<dyn SettingsProvider>) {
    replace_providers(providers, &[], &[provider]);
}

/// 移除 `stale` 中的提供者并加入 `fresh`，保持按优先级排序
fn replace_providers(
    providers: &ProviderList,
    stale: &[Arc<dyn SettingsProvider>],
    fresh: &[Arc<dyn SettingsProvider>],
) {
    let mut providers = providers.write();

    if !stale.is_empty() {
        providers.retain(|p| !stale.iter().any(|old| Arc::ptr_eq(old, p)));
        debug!("移除 {} 个旧的设置提供者", stale.len());
    }

    for provider in fresh {
        info!("注册设置提供者: {}", provider.name());
        debug!("提供者 {} 的设置键: {:?}", provider.name(), provider.keys());
        providers.push(Arc::clone(provider));
    }

    // 优先级高的在前
    providers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
}

/// 加载目录中的 HTTP 设置文件与环境变量
fn load_http_settings(dir: &Path) -> SettingsResult<Vec<Arc<dyn SettingsProvider>>> {
    let mut loaded: Vec<Arc<dyn SettingsProvider>> = Vec::new();

    let toml_path: PathBuf = dir.join(HTTP_SETTINGS_TOML);
    if toml_path.exists() {
        loaded.push(Arc::new(crate::TomlSettingsProvider::new(&toml_path)?));
    }

    let json_path: PathBuf = dir.join(HTTP_SETTINGS_JSON);
    if json_path.exists() {
        loaded.push(Arc::new(crate::JsonSettingsProvider::new(&json_path)?));
    }

    loaded.push(Arc::new(crate::EnvironmentSettingsProvider::new(
        HTTP_ENV_PREFIX,
    )));

    debug!("从 {} 加载了 {} 个设置源", dir.display(), loaded.len());
    Ok(loaded)
}

impl DomainLookup for GlobalSettings {
    fn default_domain(&self) -> SettingsResult<String> {
        self.get_string(DEFAULT_DOMAIN_KEY)
    }

    fn domain(&self, name: &str) -> SettingsResult<String> {
        self.get_string(name)
    }
}

impl SettingsRegistry for GlobalSettings {
    fn pre_init(&self) -> ConfigurationResult<()> {
        let mut state = self.pre_init.lock();
        if state.initialized {
            return Ok(());
        }

        info!("开始执行 {} 个预初始化动作", state.actions.len());

        for action in &state.actions {
            debug!("执行预初始化动作: {}", action.name());
            if let Err(source) = action.run() {
                error!("预初始化动作 {} 执行失败: {}", action.name(), source);
                return Err(ConfigurationError::PreInitFailed {
                    action: action.name().to_string(),
                    source,
                });
            }
        }

        state.initialized = true;
        info!("预初始化完成");
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.pre_init.lock().initialized
    }

    fn register_pre_init(&self, action: PreInitAction) {
        let mut state = self.pre_init.lock();

        // 同名动作原位替换，保持原有执行顺序
        match state.actions.iter_mut().find(|a| a.name() == action.name()) {
            Some(existing) => {
                debug!("替换预初始化动作: {}", action.name());
                *existing = action;
            }
            None => {
                debug!("注册预初始化动作: {}", action.name());
                state.actions.push(action);
            }
        }
    }

    fn register_provider(&self, provider: Arc<dyn SettingsProvider>) {
        insert_provider(&self.providers, provider);
    }

    fn reset(&self) {
        self.pre_init.lock().initialized = false;
        debug!("预初始化标记已清除");
    }
}
