//! 基础地址解析

use binding_common::{ConfigurationError, ConfigurationResult, MetadataMarker, SettingsError};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use settings_abstractions::{DomainLookup, DEFAULT_DOMAIN_KEY};
use std::sync::Arc;
use tracing::{debug, warn};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("占位符正则表达式有效"));

/// 基础地址解析器
///
/// 优先级从高到低：
/// 1. 端点上的完整地址标记，原样使用
/// 2. 调用方传入的域名覆盖，替换占位符后保留末尾斜杠
/// 3. 服务类型上的域名标记，替换占位符后去掉末尾斜杠
/// 4. 全局默认域名，去掉末尾斜杠
///
/// 每个域名字符串只替换第一个 `${name}` 占位符。
#[derive(Clone)]
pub struct DomainResolver {
    lookup: Arc<dyn DomainLookup>,
}

impl std::fmt::Debug for DomainResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainResolver").finish_non_exhaustive()
    }
}

impl DomainResolver {
    pub fn new(lookup: Arc<dyn DomainLookup>) -> Self {
        Self { lookup }
    }

    /// 解析端点的基础地址
    ///
    /// 未配置任何域名时返回 `None`
    pub fn resolve_url(
        &self,
        slot_markers: &[MetadataMarker],
        type_markers: &[MetadataMarker],
        domain_override: Option<&str>,
    ) -> ConfigurationResult<Option<String>> {
        if let Some(url) = find_url(slot_markers) {
            debug!("使用端点地址标记: {}", url);
            return Ok(Some(url.to_string()));
        }

        if let Some(domain) = domain_override {
            let resolved = self.substitute(domain)?;
            debug!("使用域名覆盖: {}", resolved);
            return Ok(Some(resolved));
        }

        if let Some(domain) = find_domain(type_markers) {
            let resolved = self.substitute(domain)?;
            debug!("使用服务域名标记: {}", resolved);
            return Ok(Some(strip_trailing_slashes(&resolved)));
        }

        match self.lookup.default_domain() {
            Ok(domain) => {
                debug!("使用全局默认域名: {}", domain);
                Ok(Some(strip_trailing_slashes(&domain)))
            }
            Err(SettingsError::KeyNotFound { .. }) => {
                warn!("未配置全局默认域名，端点只能使用完整地址");
                Ok(None)
            }
            Err(source) => Err(ConfigurationError::DomainResolutionFailed {
                name: DEFAULT_DOMAIN_KEY.to_string(),
                source,
            }),
        }
    }

    /// 替换域名字符串中的第一个 `${name}` 占位符
    ///
    /// 不含占位符的字符串原样返回
    pub fn substitute(&self, template: &str) -> ConfigurationResult<String> {
        let Some(captures) = PLACEHOLDER.captures(template) else {
            return Ok(template.to_string());
        };

        let name = captures.get(1).map_or("", |m| m.as_str());
        let value = self
            .lookup
            .domain(name)
            .map_err(|source| ConfigurationError::DomainResolutionFailed {
                name: name.to_string(),
                source,
            })?;

        Ok(PLACEHOLDER.replace(template, NoExpand(&value)).into_owned())
    }
}

fn find_url(markers: &[MetadataMarker]) -> Option<&str> {
    markers.iter().find_map(|marker| match marker {
        MetadataMarker::Url(url) => Some(url.as_str()),
        _ => None,
    })
}

fn find_domain(markers: &[MetadataMarker]) -> Option<&str> {
    markers.iter().find_map(|marker| match marker {
        MetadataMarker::Domain(domain) => Some(domain.as_str()),
        _ => None,
    })
}

fn strip_trailing_slashes(domain: &str) -> String {
    domain.trim_end_matches('/').to_string()
}
