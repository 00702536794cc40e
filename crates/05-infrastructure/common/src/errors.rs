//! 错误类型定义

use thiserror::Error;

/// 装箱的通用错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 服务解析错误类型
///
/// 解析期间的任何失败都会终止本次解析，调用方应视为启动期配置缺陷而非瞬时故障
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("预初始化动作 '{action}' 执行失败，请检查预初始化列表: {source}")]
    PreInitFailed { action: String, source: BoxError },

    #[error("无法实例化服务 {type_name}，服务类型必须提供无参构造")]
    InstantiationFailed { type_name: String },

    #[error("无法为服务 {type_name} 初始化端点 {slot}: {message}")]
    SlotAssignmentFailed {
        slot: String,
        type_name: String,
        message: String,
    },

    #[error("域名占位符 '${{{name}}}' 无法解析: {source}")]
    DomainResolutionFailed {
        name: String,
        #[source]
        source: SettingsError,
    },

    #[error("解析服务 {type_name} 的端点 {slot} 失败: {source}")]
    SlotResolutionFailed {
        slot: String,
        type_name: String,
        #[source]
        source: Box<ConfigurationError>,
    },
}

impl ConfigurationError {
    /// 将单个端点的失败包装为带端点和服务名称的错误
    pub fn in_slot(self, slot: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::SlotResolutionFailed {
            slot: slot.into(),
            type_name: type_name.into(),
            source: Box::new(self),
        }
    }

    /// 获取最内层的错误（跳过端点包装）
    pub fn root_cause(&self) -> &ConfigurationError {
        match self {
            Self::SlotResolutionFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// 配置源错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },
}

/// 传输层错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("请求发送失败: {message}")]
    SendFailed { message: String },

    #[error("HTTP 客户端构建失败: {message}")]
    ClientBuildFailed { message: String },

    #[error("请求超时: {url}")]
    Timeout { url: String },
}

/// 响应解码错误
#[derive(Error, Debug)]
#[error("响应解码为 {shape} 失败: {message}")]
pub struct DecodeError {
    pub shape: String,
    pub message: String,
}

impl DecodeError {
    /// 创建解码错误
    pub fn new(shape: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            message: message.into(),
        }
    }
}

/// 端点调用错误类型
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("{kind} 端点尚未解析，请先初始化所属服务")]
    UnresolvedSlot { kind: String },

    #[error("无法调用服务 {service} 的端点 {slot}: 域名未定义且路径不包含 '://'")]
    UndefinedUrl { slot: String, service: String },

    #[error("请求参数无效: {message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("响应被错误处理器拒绝: 状态码 {status}, {message}")]
    Rejected { status: u16, message: String },
}

/// 结果类型别名
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
pub type SettingsResult<T> = Result<T, SettingsError>;
pub type InvocationResult<T> = Result<T, InvocationError>;
