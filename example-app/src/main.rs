//! # 示例应用程序
//!
//! 声明一个宠物商店服务，解析其端点并打印解析结果；
//! 默认使用录制传输离线调用，`--live` 时通过 reqwest 发送真实请求。

use anyhow::Context;
use binding_abstractions::{DataMethod, EndpointSlot, RestMethod, SoapMethod, Transport};
use binding_common::{RequestArgs, ResolvedConfiguration, RawResponse};
use binding_composition::{LoggingConfig, ServiceBinder};
use binding_impl::{RecordingTransport, ReqwestTransport};
use clap::Parser;
use serde::Deserialize;
use service_macros::Service;
use settings_impl::MapSettingsProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "声明式端点解析示例")]
struct Args {
    /// 设置文件路径（TOML 或 JSON）
    #[arg(short, long, default_value = "http-settings.toml")]
    settings: String,

    /// 覆盖服务域名
    #[arg(long)]
    domain: Option<String>,

    /// 通过网络发送真实请求
    #[arg(long)]
    live: bool,

    /// 解析后调用的宠物编号
    #[arg(long, default_value = "1")]
    pet_id: String,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,
}

/// 宠物商店服务
#[derive(Default, Service)]
#[service(
    domain = "https://${petstore_host}/v2",
    header("X-Client", "example-app"),
    retry(max_attempts = 3, delay_ms = 50)
)]
struct PetStore {
    #[endpoint(get = "/pet/findByStatus", query("status", "available"))]
    list_pets: RestMethod,

    #[endpoint(get = "/pet/{id}", ignore_retry)]
    get_pet: DataMethod,

    #[endpoint(post = "/pet", content_type = "application/json")]
    add_pet: RestMethod,

    #[endpoint(url = "https://www.dneonline.com/calculator.asmx")]
    calculator: SoapMethod,

    label: String,
}

#[derive(Debug, Deserialize)]
struct Pet {
    id: i64,
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let logging = if args.json_logs {
        LoggingConfig::production()
    } else {
        LoggingConfig::default()
    };

    let transport: Arc<dyn Transport> = if args.live {
        Arc::new(ReqwestTransport::new())
    } else {
        offline_transport()
    };

    let mut builder = ServiceBinder::builder()
        .with_logging(logging)
        .add_settings_provider(
            MapSettingsProvider::new().with("petstore_host", "petstore.swagger.io"),
        )
        .with_transport(transport);

    let settings_path = Path::new(&args.settings);
    if settings_path.exists() {
        builder = if args.settings.ends_with(".json") {
            builder.add_settings_json(settings_path)?
        } else {
            builder.add_settings_toml(settings_path)?
        };
    }

    let binder = builder.build();
    let pet_store = match &args.domain {
        Some(domain) => binder.resolve_with_domain::<PetStore>(domain.as_str()),
        None => binder.resolve_default::<PetStore>(),
    }
    .context("解析 PetStore 失败")?;

    info!("服务标签: {:?}", pet_store.label);
    let slots: [(&str, &dyn EndpointSlot); 4] = [
        ("list_pets", &pet_store.list_pets),
        ("get_pet", &pet_store.get_pet),
        ("add_pet", &pet_store.add_pet),
        ("calculator", &pet_store.calculator),
    ];
    for (name, slot) in slots {
        if let Some(executor) = slot.current() {
            print_endpoint(name, executor.configuration());
        }
    }

    let pet: Pet = pet_store
        .get_pet
        .call_as(RequestArgs::path([args.pet_id.as_str()]))
        .await
        .context("调用 get_pet 失败")?;
    println!("\nget_pet -> #{} {}", pet.id, pet.name);

    Ok(())
}

fn offline_transport() -> Arc<dyn Transport> {
    let transport = RecordingTransport::new();
    transport.push_response(
        RawResponse::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"id": 1, "name": "doggie"}"#),
    );
    Arc::new(transport)
}

fn print_endpoint(name: &str, configuration: &ResolvedConfiguration) {
    let retry = configuration
        .metadata
        .retry
        .as_ref()
        .map(|r| format!("{} 次", r.effective_max_attempts()))
        .unwrap_or_else(|| "无".to_string());

    println!(
        "{:<12} {:<7} {}{}  重试: {}",
        name,
        configuration.method.as_str(),
        configuration.base_url.as_deref().unwrap_or("<未配置>"),
        configuration.path.as_deref().unwrap_or(""),
        retry
    );
}
