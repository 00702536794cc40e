//! 外部协作者接口
//!
//! 响应解码器、错误处理器与认证方案对解析引擎都是不透明的，引擎只负责把它们
//! 原样传递到构建出的执行器中。

use crate::configuration::ResolvedCookie;
use crate::errors::{DecodeError, InvocationError, InvocationResult};
use crate::http::{Credentials, PreparedRequest, RawResponse};
use std::fmt::Debug;

/// 响应解码器
pub trait ResponseDecoder: Send + Sync + Debug {
    /// 将原始响应解码为结构化值，`shape` 为目标类型名称
    fn decode(&self, response: &RawResponse, shape: &str) -> Result<serde_json::Value, DecodeError>;
}

/// 基于 JSON 的默认响应解码器
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonResponseDecoder;

impl ResponseDecoder for JsonResponseDecoder {
    fn decode(&self, response: &RawResponse, shape: &str) -> Result<serde_json::Value, DecodeError> {
        serde_json::from_slice(&response.body).map_err(|e| DecodeError::new(shape, e.to_string()))
    }
}

/// 错误处理器
pub trait ErrorHandler: Send + Sync + Debug {
    /// 响应是否包含错误
    fn has_error(&self, response: &RawResponse) -> bool;

    /// 处理错误响应
    fn handle_error(&self, response: &RawResponse) -> InvocationResult<()>;
}

/// 默认错误处理器，不拦截任何响应
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn has_error(&self, _response: &RawResponse) -> bool {
        false
    }

    fn handle_error(&self, _response: &RawResponse) -> InvocationResult<()> {
        Ok(())
    }
}

/// 状态码错误处理器，拒绝 4xx 与 5xx 响应
#[derive(Debug, Default, Clone, Copy)]
pub struct StatusErrorHandler;

impl ErrorHandler for StatusErrorHandler {
    fn has_error(&self, response: &RawResponse) -> bool {
        response.status >= 400
    }

    fn handle_error(&self, response: &RawResponse) -> InvocationResult<()> {
        Err(InvocationError::Rejected {
            status: response.status,
            message: response.body_text(),
        })
    }
}

/// 认证方案
pub trait AuthenticationScheme: Send + Sync + Debug {
    /// 方案名称
    fn name(&self) -> &str;

    /// 将凭据附加到请求
    fn apply(&self, request: &mut PreparedRequest);
}

/// HTTP Basic 认证
#[derive(Debug, Clone)]
pub struct BasicAuthentication {
    username: String,
    password: Option<String>,
}

impl BasicAuthentication {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }
}

impl AuthenticationScheme for BasicAuthentication {
    fn name(&self) -> &str {
        "basic"
    }

    fn apply(&self, request: &mut PreparedRequest) {
        request.credentials = Some(Credentials::Basic {
            username: self.username.clone(),
            password: self.password.clone(),
        });
    }
}

/// Bearer Token 认证
#[derive(Debug, Clone)]
pub struct BearerToken {
    token: String,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl AuthenticationScheme for BearerToken {
    fn name(&self) -> &str {
        "bearer"
    }

    fn apply(&self, request: &mut PreparedRequest) {
        request.credentials = Some(Credentials::Bearer(self.token.clone()));
    }
}

/// 请求规范
///
/// 调用方提供的请求模板，在端点元数据之前应用到每个请求
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSpecification {
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<ResolvedCookie>,
    pub query_params: Vec<(String, String)>,
    pub content_type: Option<String>,
}

impl RequestSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(ResolvedCookie::with_value(name, value));
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// 将模板应用到请求
    pub fn apply(&self, request: &mut PreparedRequest) {
        request.headers.extend(self.headers.iter().cloned());
        request.cookies.extend(self.cookies.iter().cloned());
        request.query_params.extend(self.query_params.iter().cloned());
        if self.content_type.is_some() {
            request.content_type.clone_from(&self.content_type);
        }
    }
}
