//! 请求与响应值类型

use crate::configuration::ResolvedCookie;
use crate::markers::{HttpMethod, MultiPartMarker, ProxyMarker, TrustStoreMarker};
use std::time::Duration;

/// 端点调用参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestArgs {
    /// 按顺序填充路径中的 `{name}` 占位符
    pub path_params: Vec<String>,
    pub query_params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅包含路径参数的调用参数
    pub fn path<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path_params: params.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn path_param(mut self, value: impl Into<String>) -> Self {
        self.path_params.push(value.into());
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// 认证凭据，由传输层负责编码
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic {
        username: String,
        password: Option<String>,
    },
    Bearer(String),
}

/// 即将发送的请求
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<ResolvedCookie>,
    pub query_params: Vec<(String, String)>,
    pub form_params: Vec<(String, String)>,
    pub multipart: Vec<MultiPartMarker>,
    pub content_type: Option<String>,
    pub body: Option<String>,
    pub credentials: Option<Credentials>,
    pub proxy: Option<ProxyMarker>,
    pub trust_store: Option<TrustStoreMarker>,
}

impl PreparedRequest {
    /// 创建空请求
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            cookies: Vec::new(),
            query_params: Vec::new(),
            form_params: Vec::new(),
            multipart: Vec::new(),
            content_type: None,
            body: None,
            credentials: None,
            proxy: None,
            trust_store: None,
        }
    }

    /// 获取第一个同名请求头（不区分大小写）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 拼接 `Cookie` 请求头
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let parts: Vec<String> = self.cookies.iter().map(ResolvedCookie::to_header_part).collect();
        Some(parts.join("; "))
    }
}

/// 原始响应
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// 获取第一个同名响应头（不区分大小写）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 响应体文本（非 UTF-8 字节会被替换）
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// 响应状态分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatusType {
    Info,
    Ok,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

impl ResponseStatusType {
    /// 根据状态码首位分类
    pub fn from_status(status: u16) -> Self {
        match status / 100 {
            1 => Self::Info,
            2 => Self::Ok,
            3 => Self::Redirect,
            4 => Self::ClientError,
            5 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// 端点调用的完整响应
#[derive(Debug, Clone)]
pub struct RestResponse {
    raw: RawResponse,
    elapsed: Duration,
    attempts: u32,
}

impl RestResponse {
    pub fn new(raw: RawResponse, elapsed: Duration, attempts: u32) -> Self {
        Self {
            raw,
            elapsed,
            attempts,
        }
    }

    pub fn status(&self) -> u16 {
        self.raw.status
    }

    pub fn status_type(&self) -> ResponseStatusType {
        ResponseStatusType::from_status(self.raw.status)
    }

    pub fn is_ok(&self) -> bool {
        self.status_type() == ResponseStatusType::Ok
    }

    pub fn has_errors(&self) -> bool {
        matches!(
            self.status_type(),
            ResponseStatusType::ClientError | ResponseStatusType::ServerError
        )
    }

    pub fn body(&self) -> String {
        self.raw.body_text()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.raw.header("content-type")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.raw.header(name)
    }

    /// 请求耗时（含所有重试）
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// 实际尝试次数
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    pub fn into_raw(self) -> RawResponse {
        self.raw
    }
}
