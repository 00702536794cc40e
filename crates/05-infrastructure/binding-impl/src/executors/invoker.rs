//! 执行器共用的请求组装与发送逻辑

use binding_abstractions::Transport;
use binding_common::{
    HttpMethod, InvocationError, InvocationResult, PreparedRequest, RawResponse, RequestArgs,
    ResolvedConfiguration, RestResponse, RetryOutcome, TransportError,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn, Instrument};

static PATH_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").expect("路径参数正则表达式有效"));

/// 请求调用器
///
/// 按以下顺序组装请求：请求规范、合并后的端点元数据、调用参数、认证方案
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    configuration: ResolvedConfiguration,
    transport: Arc<dyn Transport>,
}

impl HttpInvoker {
    pub fn new(configuration: ResolvedConfiguration, transport: Arc<dyn Transport>) -> Self {
        Self {
            configuration,
            transport,
        }
    }

    pub fn configuration(&self) -> &ResolvedConfiguration {
        &self.configuration
    }

    /// 组合完整请求地址
    ///
    /// 路径已包含 `://` 时原样使用，否则拼接在基础地址之后
    pub fn compose_url(&self, path_params: &[String]) -> InvocationResult<String> {
        let path = fill_path_params(self.configuration.path.as_deref().unwrap_or(""), path_params)?;

        let full = if path.contains("://") {
            path
        } else {
            let base = self.configuration.base_url.as_deref().ok_or_else(|| {
                InvocationError::UndefinedUrl {
                    slot: self.configuration.slot.clone(),
                    service: self.configuration.service.clone(),
                }
            })?;
            format!("{base}{path}")
        };

        url::Url::parse(&full).map_err(|e| InvocationError::InvalidRequest {
            message: format!("无效的请求地址 {full}: {e}"),
        })?;
        Ok(full)
    }

    /// 组装请求
    pub fn prepare(
        &self,
        method: HttpMethod,
        args: RequestArgs,
        default_content_type: Option<&str>,
    ) -> InvocationResult<PreparedRequest> {
        let config = &self.configuration;
        let mut request = PreparedRequest::new(method, self.compose_url(&args.path_params)?);

        if let Some(specification) = &config.request_specification {
            specification.apply(&mut request);
        }

        let metadata = &config.metadata;
        request.headers.extend(
            metadata
                .headers
                .iter()
                .map(|h| (h.name.clone(), h.value.clone())),
        );
        request.cookies.extend(metadata.cookies.iter().cloned());
        request.query_params.extend(
            metadata
                .query_params
                .iter()
                .map(|p| (p.name.clone(), p.value.clone())),
        );
        request.form_params.extend(
            metadata
                .form_params
                .iter()
                .map(|p| (p.name.clone(), p.value.clone())),
        );
        request.multipart.extend(metadata.multipart.iter().cloned());
        if metadata.content_type.is_some() {
            request.content_type.clone_from(&metadata.content_type);
        }
        request.proxy.clone_from(&metadata.proxy);
        request.trust_store.clone_from(&metadata.trust_store);

        request.query_params.extend(args.query_params);
        request.headers.extend(args.headers);
        request.body = args.body;

        if request.content_type.is_none() {
            request.content_type = default_content_type.map(str::to_string);
        }

        if let Some(scheme) = &config.authentication_scheme {
            debug!("应用认证方案: {}", scheme.name());
            scheme.apply(&mut request);
        }

        Ok(request)
    }

    /// 发送请求，按重试策略重试，并交由错误处理器检查
    pub async fn execute(&self, request: PreparedRequest) -> InvocationResult<RestResponse> {
        let span = tracing::info_span!(
            "invoke",
            request_id = %uuid::Uuid::new_v4(),
            service = %self.configuration.service,
            slot = %self.configuration.slot,
        );

        async move {
            info!("{} {}", request.method, request.url);
            let started = Instant::now();
            let (raw, attempts) = self.send_with_retry(request).await?;
            let elapsed = started.elapsed();
            info!(
                status = raw.status,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "请求完成"
            );

            let handler = &self.configuration.error_handler;
            if handler.has_error(&raw) {
                warn!("错误处理器标记响应失败: {}", raw.status);
                handler.handle_error(&raw)?;
            }

            Ok(RestResponse::new(raw, elapsed, attempts))
        }
        .instrument(span)
        .await
    }

    async fn send_with_retry(&self, request: PreparedRequest) -> InvocationResult<(RawResponse, u32)> {
        let Some(policy) = &self.configuration.metadata.retry else {
            let raw = self.transport.send(request).await?;
            return Ok((raw, 1));
        };

        let max_attempts = policy.effective_max_attempts();
        let mut attempt = 1;

        loop {
            let outcome: Result<RawResponse, TransportError> =
                self.transport.send(request.clone()).await;

            let retry = attempt < max_attempts
                && match &outcome {
                    Ok(raw) => policy.should_retry(&RetryOutcome::Response(raw)),
                    Err(error) => policy.should_retry(&RetryOutcome::Failure(error)),
                };

            if !retry {
                if attempt > 1 {
                    info!(attempt, "重试后完成请求");
                }
                return outcome.map(|raw| (raw, attempt)).map_err(Into::into);
            }

            let delay = policy.effective_delay();
            match &outcome {
                Ok(raw) => warn!(attempt, max_attempts, status = raw.status, "请求需要重试"),
                Err(error) => warn!(attempt, max_attempts, error = %error, "请求失败，准备重试"),
            }
            debug!(delay_ms = delay.as_millis() as u64, "等待后重试");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// 按顺序填充路径中的 `{name}` 占位符
fn fill_path_params(path: &str, params: &[String]) -> InvocationResult<String> {
    let placeholders = PATH_PARAM.find_iter(path).count();
    if placeholders != params.len() {
        return Err(InvocationError::InvalidRequest {
            message: format!(
                "路径 {path} 需要 {placeholders} 个参数，实际提供 {} 个",
                params.len()
            ),
        });
    }

    let mut values = params.iter();
    Ok(PATH_PARAM
        .replace_all(path, |_: &regex::Captures<'_>| {
            values.next().cloned().unwrap_or_default()
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use binding_common::{
        BearerToken, EndpointMetadata, HeaderMarker, RequestSpecification, RetryPolicy,
        ServiceSettings, StatusErrorHandler,
    };
    use std::time::Duration;

    fn configuration(
        path: Option<&str>,
        base_url: Option<&str>,
        metadata: EndpointMetadata,
        settings: &ServiceSettings,
    ) -> ResolvedConfiguration {
        ResolvedConfiguration::new(
            "UserService",
            "get_user",
            (HttpMethod::Get, path.map(str::to_string)),
            base_url.map(str::to_string),
            metadata,
            settings,
        )
    }

    fn invoker(config: ResolvedConfiguration, transport: &Arc<RecordingTransport>) -> HttpInvoker {
        let transport: Arc<dyn Transport> = Arc::clone(transport) as Arc<dyn Transport>;
        HttpInvoker::new(config, transport)
    }

    #[test]
    fn test_compose_url() {
        let transport = Arc::new(RecordingTransport::new());
        let settings = ServiceSettings::default();

        let joined = invoker(
            configuration(Some("/users/{id}"), Some("https://api.local"), Default::default(), &settings),
            &transport,
        );
        assert_eq!(
            joined.compose_url(&["7".to_string()]).unwrap(),
            "https://api.local/users/7"
        );
        assert!(matches!(
            joined.compose_url(&[]),
            Err(InvocationError::InvalidRequest { .. })
        ));

        let absolute = invoker(
            configuration(Some("https://other.local/ping"), None, Default::default(), &settings),
            &transport,
        );
        assert_eq!(absolute.compose_url(&[]).unwrap(), "https://other.local/ping");

        let undefined = invoker(configuration(Some("/ping"), None, Default::default(), &settings), &transport);
        assert!(matches!(
            undefined.compose_url(&[]),
            Err(InvocationError::UndefinedUrl { ref slot, ref service })
                if slot == "get_user" && service == "UserService"
        ));
    }

    #[test]
    fn test_prepare_applies_layers_in_order() {
        let transport = Arc::new(RecordingTransport::new());
        let settings = ServiceSettings::builder()
            .request_specification(RequestSpecification::new().header("X-Layer", "spec"))
            .authentication_scheme(Arc::new(BearerToken::new("t")))
            .build();
        let metadata = EndpointMetadata {
            headers: vec![HeaderMarker::new("X-Layer", "endpoint")],
            content_type: Some("application/json".to_string()),
            ..Default::default()
        };

        let request = invoker(
            configuration(Some("/users"), Some("https://api.local"), metadata, &settings),
            &transport,
        )
        .prepare(
            HttpMethod::Get,
            RequestArgs::new().header("X-Layer", "call").query_param("q", "1"),
            Some("text/plain"),
        )
        .unwrap();

        let layers: Vec<&str> = request
            .headers
            .iter()
            .filter(|(name, _)| name == "X-Layer")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(layers, vec!["spec", "endpoint", "call"]);
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
        assert_eq!(request.query_params, vec![("q".to_string(), "1".to_string())]);
        assert!(request.credentials.is_some());
    }

    #[tokio::test]
    async fn test_execute_without_retry_sends_once() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(RawResponse::new(503));
        let settings = ServiceSettings::default();
        let invoker = invoker(
            configuration(Some("/ping"), Some("https://api.local"), Default::default(), &settings),
            &transport,
        );

        let request = invoker.prepare(HttpMethod::Get, RequestArgs::new(), None).unwrap();
        let response = invoker.execute(request).await.unwrap();

        assert_eq!(response.status(), 503);
        assert_eq!(response.attempts(), 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_retries_until_success() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(RawResponse::new(502));
        transport.push_failure(TransportError::SendFailed {
            message: "reset".to_string(),
        });
        transport.push_response(RawResponse::new(200));

        let settings = ServiceSettings::default();
        let metadata = EndpointMetadata {
            retry: Some(RetryPolicy {
                max_attempts: Some(5),
                delay: Some(Duration::from_millis(1)),
                trigger: None,
            }),
            ..Default::default()
        };
        let invoker = invoker(
            configuration(Some("/ping"), Some("https://api.local"), metadata, &settings),
            &transport,
        );

        let request = invoker.prepare(HttpMethod::Get, RequestArgs::new(), None).unwrap();
        let response = invoker.execute(request).await.unwrap();

        assert!(response.is_ok());
        assert_eq!(response.attempts(), 3);
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_execute_stops_at_max_attempts() {
        let transport = Arc::new(RecordingTransport::new());
        for _ in 0..5 {
            transport.push_response(RawResponse::new(503));
        }

        let settings = ServiceSettings::default();
        let metadata = EndpointMetadata {
            retry: Some(RetryPolicy {
                max_attempts: Some(2),
                delay: Some(Duration::from_millis(1)),
                trigger: None,
            }),
            ..Default::default()
        };
        let invoker = invoker(
            configuration(Some("/ping"), Some("https://api.local"), metadata, &settings),
            &transport,
        );

        let request = invoker.prepare(HttpMethod::Get, RequestArgs::new(), None).unwrap();
        let response = invoker.execute(request).await.unwrap();

        assert_eq!(response.status(), 503);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_error_handler_rejects_response() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(RawResponse::new(404).with_body("missing"));

        let settings = ServiceSettings::builder()
            .error_handler(Arc::new(StatusErrorHandler))
            .build();
        let invoker = invoker(
            configuration(Some("/ping"), Some("https://api.local"), Default::default(), &settings),
            &transport,
        );

        let request = invoker.prepare(HttpMethod::Get, RequestArgs::new(), None).unwrap();
        assert!(matches!(
            invoker.execute(request).await,
            Err(InvocationError::Rejected { status: 404, .. })
        ));
    }
}
