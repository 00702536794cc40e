//! 基于 reqwest 的网络传输

use async_trait::async_trait;
use binding_abstractions::Transport;
use binding_common::{Credentials, HttpMethod, PreparedRequest, RawResponse, TransportError};
use dashmap::DashMap;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, info};

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 客户端缓存键：代理地址与信任证书路径
type ClientKey = (Option<String>, Option<String>);

/// 基于 reqwest 的网络传输
///
/// 按代理与信任证书组合缓存客户端，相同组合的请求复用连接池
#[derive(Debug)]
pub struct ReqwestTransport {
    timeout: Duration,
    clients: DashMap<ClientKey, Client>,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            clients: DashMap::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 已缓存的客户端数量
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    async fn client_for(&self, request: &PreparedRequest) -> Result<Client, TransportError> {
        let key: ClientKey = (
            request.proxy.as_ref().map(|p| p.url()),
            request.trust_store.as_ref().map(|t| t.path.clone()),
        );
        if let Some(client) = self.clients.get(&key) {
            return Ok(client.clone());
        }

        let mut builder = Client::builder().timeout(self.timeout);

        if let Some(proxy_url) = &key.0 {
            debug!("使用代理: {}", proxy_url);
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(build_failed)?;
            builder = builder.proxy(proxy);
        }

        if let Some(path) = &key.1 {
            debug!("加载信任证书: {}", path);
            let pem = tokio::fs::read(path)
                .await
                .map_err(|e| TransportError::ClientBuildFailed {
                    message: format!("读取信任证书 {path} 失败: {e}"),
                })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(build_failed)?;
            builder = builder.add_root_certificate(certificate);
        }

        let client = builder.build().map_err(build_failed)?;
        info!("创建 HTTP 客户端, 代理: {:?}, 信任证书: {:?}", key.0, key.1);
        Ok(self.clients.entry(key).or_insert(client).clone())
    }

    async fn multipart_form(request: &PreparedRequest) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for (name, value) in &request.form_params {
            form = form.text(name.clone(), value.clone());
        }

        for part in &request.multipart {
            let bytes = tokio::fs::read(&part.file_path)
                .await
                .map_err(|e| TransportError::SendFailed {
                    message: format!("读取上传文件 {} 失败: {e}", part.file_path),
                })?;
            let mut file = Part::bytes(bytes).file_name(part.file_name.clone());
            if !part.mime_type.is_empty() {
                file = file
                    .mime_str(&part.mime_type)
                    .map_err(|e| TransportError::SendFailed {
                        message: format!("无效的 MIME 类型 {}: {e}", part.mime_type),
                    })?;
            }
            form = form.part(part.control_name.clone(), file);
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportError> {
        let client = self.client_for(&request).await?;
        let mut builder = client.request(to_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(cookie) = request.cookie_header() {
            builder = builder.header(reqwest::header::COOKIE, cookie);
        }
        if !request.query_params.is_empty() {
            builder = builder.query(&request.query_params);
        }

        match &request.credentials {
            Some(Credentials::Basic { username, password }) => {
                builder = builder.basic_auth(username, password.as_ref());
            }
            Some(Credentials::Bearer(token)) => builder = builder.bearer_auth(token),
            None => {}
        }

        if !request.multipart.is_empty() {
            builder = builder.multipart(Self::multipart_form(&request).await?);
        } else {
            if let Some(content_type) = &request.content_type {
                builder = builder.header(reqwest::header::CONTENT_TYPE, content_type.as_str());
            }
            if !request.form_params.is_empty() {
                builder = builder.form(&request.form_params);
            } else if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                TransportError::SendFailed {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::SendFailed {
                message: format!("读取响应体失败: {e}"),
            })?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

fn build_failed(error: reqwest::Error) -> TransportError {
    TransportError::ClientBuildFailed {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binding_common::{ProxyMarker, TrustStoreMarker};

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_method(HttpMethod::Get), Method::GET);
        assert_eq!(to_method(HttpMethod::Options), Method::OPTIONS);
    }

    #[tokio::test]
    async fn test_clients_cached_per_proxy() {
        let transport = ReqwestTransport::new().with_timeout(Duration::from_secs(1));

        let plain = PreparedRequest::new(HttpMethod::Get, "https://example.com");
        let mut proxied = plain.clone();
        proxied.proxy = Some(ProxyMarker::new("http", "127.0.0.1", 3128));

        transport.client_for(&plain).await.unwrap();
        transport.client_for(&plain).await.unwrap();
        transport.client_for(&proxied).await.unwrap();

        assert_eq!(transport.client_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_trust_store_fails_client_build() {
        let transport = ReqwestTransport::new();
        let mut request = PreparedRequest::new(HttpMethod::Get, "https://example.com");
        request.trust_store = Some(TrustStoreMarker::new("/nonexistent/ca.pem"));

        assert!(matches!(
            transport.client_for(&request).await,
            Err(TransportError::ClientBuildFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_multipart_form_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut request = PreparedRequest::new(HttpMethod::Post, "https://example.com");
        request.form_params.push(("kind".to_string(), "daily".to_string()));
        request.multipart.push(binding_common::MultiPartMarker {
            control_name: "file".to_string(),
            file_name: "report.csv".to_string(),
            file_path: path.to_string_lossy().into_owned(),
            mime_type: "text/csv".to_string(),
        });

        let form = ReqwestTransport::multipart_form(&request).await.unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[tokio::test]
    async fn test_missing_upload_file_fails() {
        let mut request = PreparedRequest::new(HttpMethod::Post, "https://example.com");
        request.multipart.push(binding_common::MultiPartMarker {
            control_name: "file".to_string(),
            file_name: "a.txt".to_string(),
            file_path: "/nonexistent/a.txt".to_string(),
            mime_type: "text/plain".to_string(),
        });

        assert!(matches!(
            ReqwestTransport::multipart_form(&request).await,
            Err(TransportError::SendFailed { .. })
        ));
    }
}
