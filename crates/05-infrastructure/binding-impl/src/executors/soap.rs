//! SOAP 执行器

use super::invoker::HttpInvoker;
use async_trait::async_trait;
use binding_abstractions::{ExecutorKind, RequestExecutor};
use binding_common::{
    HttpMethod, InvocationResult, RequestArgs, ResolvedConfiguration, RestResponse,
};

/// SOAP 1.1 默认内容类型
pub const SOAP_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

const ENVELOPE_OPEN: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body>"#;
const ENVELOPE_CLOSE: &str = "</soapenv:Body></soapenv:Envelope>";

/// SOAP 执行器
///
/// 总是以 POST 发送；消息体不是完整信封时自动包装
#[derive(Debug, Clone)]
pub struct SoapExecutor {
    invoker: HttpInvoker,
}

impl SoapExecutor {
    pub fn new(invoker: HttpInvoker) -> Self {
        Self { invoker }
    }
}

#[async_trait]
impl RequestExecutor for SoapExecutor {
    fn kind(&self) -> ExecutorKind {
        ExecutorKind::Soap
    }

    fn configuration(&self) -> &ResolvedConfiguration {
        self.invoker.configuration()
    }

    async fn invoke(&self, mut args: RequestArgs) -> InvocationResult<RestResponse> {
        args.body = args.body.map(|body| wrap_envelope(&body));
        let request = self
            .invoker
            .prepare(HttpMethod::Post, args, Some(SOAP_CONTENT_TYPE))?;
        self.invoker.execute(request).await
    }
}

/// 把消息体包装为 SOAP 信封
pub fn wrap_envelope(body: &str) -> String {
    if body.contains(":Envelope") || body.trim_start().starts_with("<Envelope") {
        return body.to_string();
    }
    format!("{ENVELOPE_OPEN}{body}{ENVELOPE_CLOSE}")
}
