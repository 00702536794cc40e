//! # Settings Abstractions
//!
//! 全局设置的抽象层。
//!
//! ## 核心接口
//!
//! - [`SettingsProvider`] - 设置提供者接口
//! - [`DomainLookup`] - 域名查找接口
//! - [`SettingsRegistry`] - 全局设置注册表接口（预初始化 + 域名查找）
//! - [`PreInitAction`] - 预初始化动作

pub mod lookup;
pub mod pre_init;
pub mod provider;

pub use lookup::*;
pub use pre_init::*;
pub use provider::*;
