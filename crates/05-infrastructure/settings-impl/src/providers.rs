//! 设置提供者实现

use binding_common::{SettingsError, SettingsResult};
use serde_json::Value;
use settings_abstractions::SettingsProvider;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 按 `a.b.c` 路径在 JSON 值中查找
fn nested_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, part| current.get(part))
}

/// 递归收集所有键
fn collect_keys(obj: &serde_json::Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in obj {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Value::Object(nested) = value {
            collect_keys(nested, &full_key, keys);
        }
        keys.push(full_key);
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// 将字符串解析为最贴近的 JSON 值
fn parse_scalar(value: &str) -> Value {
    if let Ok(bool_val) = value.parse::<bool>() {
        Value::Bool(bool_val)
    } else if let Ok(int_val) = value.parse::<i64>() {
        Value::Number(serde_json::Number::from(int_val))
    } else {
        Value::String(value.to_string())
    }
}

/// TOML 设置提供者
#[derive(Debug)]
pub struct TomlSettingsProvider {
    file_path: PathBuf,
    config: Value,
    priority: i32,
}

impl TomlSettingsProvider {
    /// 从文件创建 TOML 设置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        debug!("加载 TOML 设置文件: {}", file_path.display());

        let content = std::fs::read_to_string(&file_path)?;
        let mut provider = Self::from_str(&content)?;
        provider.file_path = file_path;

        debug!("TOML 设置文件加载完成");
        Ok(provider)
    }

    /// 从 TOML 文本创建提供者
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SettingsResult<Self> {
        let table: toml::Value = toml::from_str(content).map_err(|e| SettingsError::ParseError {
            source: Box::new(e),
        })?;

        Ok(Self {
            file_path: PathBuf::new(),
            config: toml_to_json(&table),
            priority: 100, // TOML 文件默认高优先级
        })
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 来源文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl SettingsProvider for TomlSettingsProvider {
    fn get(&self, key: &str) -> SettingsResult<Value> {
        nested_value(&self.config, key)
            .cloned()
            .ok_or_else(|| SettingsError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(obj) = &self.config {
            collect_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "TomlSettingsProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// JSON 设置提供者
#[derive(Debug)]
pub struct JsonSettingsProvider {
    file_path: PathBuf,
    config: Value,
    priority: i32,
}

impl JsonSettingsProvider {
    /// 从文件创建 JSON 设置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> SettingsResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        debug!("加载 JSON 设置文件: {}", file_path.display());

        let content = std::fs::read_to_string(&file_path)?;
        let config = serde_json::from_str(&content).map_err(|e| SettingsError::ParseError {
            source: Box::new(e),
        })?;

        debug!("JSON 设置文件加载完成");
        Ok(Self {
            file_path,
            config,
            priority: 90, // JSON 文件中等优先级
        })
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 来源文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl SettingsProvider for JsonSettingsProvider {
    fn get(&self, key: &str) -> SettingsResult<Value> {
        nested_value(&self.config, key)
            .cloned()
            .ok_or_else(|| SettingsError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(obj) = &self.config {
            collect_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "JsonSettingsProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 环境变量设置提供者
///
/// `HTTP_DOMAIN` 映射为 `domain`，`HTTP_API_HOST` 映射为 `api.host`
#[derive(Debug)]
pub struct EnvironmentSettingsProvider {
    prefix: String,
    separator: String,
    priority: i32,
    raw_vars: Vec<(String, String)>,
    env_vars: HashMap<String, String>,
}

impl EnvironmentSettingsProvider {
    /// 从当前进程环境创建提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// 从给定的变量集合创建提供者
    pub fn from_vars<I>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = prefix.into();
        let raw_vars = vars
            .into_iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .collect();

        let mut provider = Self {
            prefix,
            separator: "_".to_string(),
            priority: 200, // 环境变量最高优先级
            raw_vars,
            env_vars: HashMap::new(),
        };
        provider.load_env_vars();
        provider
    }

    /// 设置分隔符
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self.load_env_vars();
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 变量前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn load_env_vars(&mut self) {
        debug!("加载环境变量，前缀: {}", self.prefix);

        self.env_vars = self
            .raw_vars
            .iter()
            .map(|(key, value)| (self.env_key_to_config_key(key), value.clone()))
            .filter(|(key, _)| !key.is_empty())
            .collect();

        debug!("加载了 {} 个环境变量", self.env_vars.len());
    }

    /// 将环境变量键转换为设置键
    fn env_key_to_config_key(&self, env_key: &str) -> String {
        let key = env_key
            .strip_prefix(&self.prefix)
            .unwrap_or(env_key)
            .trim_start_matches(self.separator.as_str());

        key.replace(&self.separator, ".").to_lowercase()
    }
}

impl SettingsProvider for EnvironmentSettingsProvider {
    fn get(&self, key: &str) -> SettingsResult<Value> {
        self.env_vars
            .get(key)
            .map(|value| parse_scalar(value))
            .ok_or_else(|| SettingsError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn keys(&self) -> Vec<String> {
        self.env_vars.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        "EnvironmentSettingsProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 内存设置提供者
///
/// 用于程序化设置与测试
#[derive(Debug, Default)]
pub struct MapSettingsProvider {
    values: HashMap<String, Value>,
    priority: i32,
}

impl MapSettingsProvider {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            priority: 50,
        }
    }

    /// 设置一个值
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapSettingsProvider {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |provider, (key, value)| provider.with(key, value))
    }
}

impl SettingsProvider for MapSettingsProvider {
    fn get(&self, key: &str) -> SettingsResult<Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| SettingsError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        "MapSettingsProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
