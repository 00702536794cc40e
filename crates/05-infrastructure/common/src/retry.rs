//! 重试策略
//!
//! 重试标记允许只指定部分字段，未指定的字段在合并时从低优先级策略继承。

use crate::errors::TransportError;
use crate::http::RawResponse;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 默认总尝试次数（首次请求加一次重试）
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// 默认重试间隔
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(10);

/// 默认触发重试的状态码
pub const DEFAULT_RETRY_STATUSES: [u16; 2] = [502, 503];

/// 一次尝试的结果，供重试触发条件判定
#[derive(Debug)]
pub enum RetryOutcome<'a> {
    /// 收到响应
    Response(&'a RawResponse),
    /// 传输失败
    Failure(&'a TransportError),
}

type TriggerFn = dyn Fn(&RetryOutcome<'_>) -> bool + Send + Sync;

/// 重试触发条件
#[derive(Clone)]
pub struct RetryTrigger {
    name: String,
    predicate: Arc<TriggerFn>,
}

impl RetryTrigger {
    /// 使用自定义判定函数创建触发条件
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&RetryOutcome<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// 状态码命中或传输失败时重试
    pub fn on_status(statuses: &[u16]) -> Self {
        let statuses = statuses.to_vec();
        let name = format!("status{statuses:?}");
        Self::new(name, move |outcome| match outcome {
            RetryOutcome::Response(response) => statuses.contains(&response.status),
            RetryOutcome::Failure(_) => true,
        })
    }

    /// 触发条件名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 判定是否需要重试
    pub fn should_retry(&self, outcome: &RetryOutcome<'_>) -> bool {
        (self.predicate)(outcome)
    }
}

impl Default for RetryTrigger {
    fn default() -> Self {
        Self::on_status(&DEFAULT_RETRY_STATUSES)
    }
}

impl fmt::Debug for RetryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryTrigger")
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for RetryTrigger {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// 重试标记
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryMarker {
    /// 总尝试次数
    pub max_attempts: Option<u32>,
    /// 两次尝试之间的间隔
    pub delay: Option<Duration>,
    /// 触发条件
    pub trigger: Option<RetryTrigger>,
}

impl RetryMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_delay_ms(self, delay_ms: u64) -> Self {
        self.with_delay(Duration::from_millis(delay_ms))
    }

    pub fn with_trigger(mut self, trigger: RetryTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }
}

/// 重试策略
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: Option<u32>,
    pub delay: Option<Duration>,
    pub trigger: Option<RetryTrigger>,
}

impl RetryPolicy {
    /// 从重试标记创建策略
    pub fn from_marker(marker: &RetryMarker) -> Self {
        Self {
            max_attempts: marker.max_attempts,
            delay: marker.delay,
            trigger: marker.trigger.clone(),
        }
    }

    /// 按字段合并端点级标记
    ///
    /// 端点上显式指定的字段生效，其余字段沿用当前策略
    pub fn merged_with(&self, slot_marker: &RetryMarker) -> Self {
        Self {
            max_attempts: slot_marker.max_attempts.or(self.max_attempts),
            delay: slot_marker.delay.or(self.delay),
            trigger: slot_marker
                .trigger
                .clone()
                .or_else(|| self.trigger.clone()),
        }
    }

    /// 实际总尝试次数，至少为 1
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1)
    }

    /// 实际重试间隔
    pub fn effective_delay(&self) -> Duration {
        self.delay.unwrap_or(DEFAULT_RETRY_DELAY)
    }

    /// 判定一次尝试的结果是否需要重试
    pub fn should_retry(&self, outcome: &RetryOutcome<'_>) -> bool {
        match &self.trigger {
            Some(trigger) => trigger.should_retry(outcome),
            None => RetryTrigger::default().should_retry(outcome),
        }
    }
}
