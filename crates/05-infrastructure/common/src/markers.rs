//! 元数据标记定义
//!
//! 描述可附加到服务类型（作为所有端点的默认值）或单个端点（覆盖默认值）上的
//! 声明式配置。标记是不可变的纯数据，不包含任何行为。

use crate::retry::RetryMarker;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未赋值哨兵
///
/// Cookie 标记的取值与附加取值使用此值表示"未指定"
pub const UNASSIGNED: &str = "[unassigned]";

/// HTTP 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// 方法标记的检查顺序，首个命中者生效
    pub const PRIORITY: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// 获取方法名称
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Get
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 方法与路径标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodMarker {
    pub method: HttpMethod,
    pub path: String,
}

/// 请求头标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMarker {
    pub name: String,
    pub value: String,
}

impl HeaderMarker {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Cookie 标记
///
/// `value` 与 `additional_values` 的默认值均为 [`UNASSIGNED`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieMarker {
    pub name: String,
    pub value: String,
    pub additional_values: Vec<String>,
}

impl CookieMarker {
    /// 创建只有名称的 Cookie 标记
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: UNASSIGNED.to_string(),
            additional_values: vec![UNASSIGNED.to_string()],
        }
    }

    /// 设置取值
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// 设置附加取值
    pub fn with_additional_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// 取值是否未指定
    pub fn is_value_unassigned(&self) -> bool {
        self.value == UNASSIGNED
    }

    /// 附加取值是否未指定（首个附加取值为哨兵或列表为空）
    pub fn are_additional_values_unassigned(&self) -> bool {
        self.additional_values
            .first()
            .map_or(true, |first| first == UNASSIGNED)
    }
}

/// 查询参数或表单参数标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMarker {
    pub name: String,
    pub value: String,
}

impl ParameterMarker {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 代理标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyMarker {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl ProxyMarker {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// 代理地址，例如 `http://proxy.local:8080`
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// 信任证书标记
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustStoreMarker {
    /// PEM 证书文件路径
    pub path: String,
    pub password: Option<String>,
}

impl TrustStoreMarker {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

/// 多部分表单文件标记
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MultiPartMarker {
    pub control_name: String,
    pub file_name: String,
    pub file_path: String,
    pub mime_type: String,
}

/// 元数据标记
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataMarker {
    /// 请求方法与路径（仅端点级有效）
    Method(MethodMarker),
    Header(HeaderMarker),
    Cookie(CookieMarker),
    QueryParameter(ParameterMarker),
    FormParameter(ParameterMarker),
    ContentType(String),
    Proxy(ProxyMarker),
    TrustStore(TrustStoreMarker),
    Retry(RetryMarker),
    /// 忽略任何重试策略（仅端点级有效）
    IgnoreRetry,
    /// 服务域名，可包含一个 `${name}` 占位符（仅类型级有效）
    Domain(String),
    /// 完整地址，原样使用（仅端点级有效）
    Url(String),
    MultiPart(MultiPartMarker),
}

impl MetadataMarker {
    pub fn method(method: HttpMethod, path: impl Into<String>) -> Self {
        Self::Method(MethodMarker {
            method,
            path: path.into(),
        })
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Delete, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Patch, path)
    }

    pub fn head(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Head, path)
    }

    pub fn options(path: impl Into<String>) -> Self {
        Self::method(HttpMethod::Options, path)
    }

    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Header(HeaderMarker::new(name, value))
    }

    pub fn query(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::QueryParameter(ParameterMarker::new(name, value))
    }

    pub fn form(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::FormParameter(ParameterMarker::new(name, value))
    }

    pub fn content_type(value: impl Into<String>) -> Self {
        Self::ContentType(value.into())
    }

    pub fn domain(value: impl Into<String>) -> Self {
        Self::Domain(value.into())
    }

    pub fn url(value: impl Into<String>) -> Self {
        Self::Url(value.into())
    }

    /// 标记种类名称，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Method(_) => "method",
            Self::Header(_) => "header",
            Self::Cookie(_) => "cookie",
            Self::QueryParameter(_) => "query",
            Self::FormParameter(_) => "form",
            Self::ContentType(_) => "content_type",
            Self::Proxy(_) => "proxy",
            Self::TrustStore(_) => "trust_store",
            Self::Retry(_) => "retry",
            Self::IgnoreRetry => "ignore_retry",
            Self::Domain(_) => "domain",
            Self::Url(_) => "url",
            Self::MultiPart(_) => "multipart",
        }
    }
}
