//! # Settings Implementation
//!
//! 全局设置注册表与各种设置源的具体实现。
//!
//! ## 主要组件
//!
//! - [`GlobalSettings`] - 全局设置注册表（预初始化列表 + 域名查找）
//! - [`TomlSettingsProvider`] - TOML 设置提供者
//! - [`JsonSettingsProvider`] - JSON 设置提供者
//! - [`EnvironmentSettingsProvider`] - 环境变量设置提供者
//! - [`MapSettingsProvider`] - 内存设置提供者

pub mod providers;
pub mod registry;

pub use providers::*;
pub use registry::*;
