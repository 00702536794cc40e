//! 设置提供者抽象接口

use binding_common::{SettingsError, SettingsResult};
use serde_json::Value;

/// 设置提供者 trait
///
/// 定义从不同数据源获取设置的统一接口。解析过程不进行异步 I/O，
/// 因此接口是同步的，数据源在创建时一次性加载。
pub trait SettingsProvider: Send + Sync + std::fmt::Debug {
    /// 获取设置值，键支持 `a.b.c` 形式的嵌套路径
    fn get(&self, key: &str) -> SettingsResult<Value>;

    /// 获取字符串设置值
    fn get_string(&self, key: &str) -> SettingsResult<String> {
        match self.get(key)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(SettingsError::TypeConversionError {
                message: format!("设置 {key} 不是字符串: {other}"),
            }),
        }
    }

    /// 获取所有设置键
    fn keys(&self) -> Vec<String>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越大越优先
    fn priority(&self) -> i32 {
        0
    }
}
