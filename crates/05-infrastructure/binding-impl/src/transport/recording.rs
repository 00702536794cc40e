//! 录制传输
//!
//! 不进行网络 I/O，按顺序返回预置的响应并记录发出的请求，用于离线演示与测试。

use async_trait::async_trait;
use binding_abstractions::Transport;
use binding_common::{PreparedRequest, RawResponse, TransportError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::debug;

/// 录制传输
#[derive(Debug)]
pub struct RecordingTransport {
    queued: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
    requests: Mutex<Vec<PreparedRequest>>,
    fallback_status: u16,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    /// 队列为空时返回 200
    pub fn new() -> Self {
        Self::with_fallback_status(200)
    }

    /// 指定队列为空时返回的状态码
    pub fn with_fallback_status(status: u16) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fallback_status: status,
        }
    }

    /// 追加预置响应
    pub fn push_response(&self, response: RawResponse) {
        self.queued.lock().push_back(Ok(response));
    }

    /// 追加一次传输失败
    pub fn push_failure(&self, error: TransportError) {
        self.queued.lock().push_back(Err(error));
    }

    /// 已发出的请求
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests.lock().last().cloned()
    }

    /// 清空录制的请求与预置响应
    pub fn reset(&self) {
        self.queued.lock().clear();
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        debug!("录制请求: {} {}", request.method, request.url);
        self.requests.lock().push(request);

        self.queued
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(self.fallback_status)))
    }

    fn name(&self) -> &str {
        "recording"
    }
}
