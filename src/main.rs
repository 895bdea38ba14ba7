//! Dobbe - 牙科 X 光 DICOM 检测工作台
//!
//! - Domain: dicom/, detection/ (Bounded Contexts)
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, worker, adapters, events

use std::sync::Arc;

use dobbe::application::{DetectionEnginePort, ReportGeneratorPort};
use dobbe::config::{load_config, print_config, ApiConfig};
use dobbe::infrastructure::adapters::{
    DicomRasterDecoder, FakeDetectionClient, FakeDetectionClientConfig, HttpDetectionClient,
    HttpDetectionClientConfig,
};
use dobbe::infrastructure::events::EventPublisher;
use dobbe::infrastructure::http::{AppState, HttpServer, ServerConfig};
use dobbe::infrastructure::memory::InMemoryFileRegistry;
use dobbe::infrastructure::worker::DetectionTracker;

type RemoteClients = (Arc<dyn DetectionEnginePort>, Arc<dyn ReportGeneratorPort>);

/// 按配置创建检测 / 报告客户端
fn build_clients(api: &ApiConfig) -> anyhow::Result<RemoteClients> {
    if api.fake {
        let client = Arc::new(FakeDetectionClient::new(FakeDetectionClientConfig {
            latency_ms: api.fake_latency_ms,
        }));
        return Ok((client.clone(), client));
    }

    let client_config = HttpDetectionClientConfig::new(&api.url).with_timeout(api.timeout_secs);
    let client = Arc::new(HttpDetectionClient::new(client_config)?);
    Ok((client.clone(), client))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},dobbe={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Dobbe - DICOM detection workbench");
    print_config(&config);

    let (detection_engine, report_generator) = build_clients(&config.api)?;
    if !config.api.fake && !detection_engine.health_check().await {
        tracing::warn!(url = %config.api.url, "Detection service is not reachable yet");
    }

    let event_publisher = Arc::new(EventPublisher::new());
    let registry = Arc::new(InMemoryFileRegistry::new());
    let tracker = Arc::new(DetectionTracker::new(
        detection_engine.clone(),
        event_publisher.clone(),
    ));
    let decoder = Arc::new(DicomRasterDecoder::new());

    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        registry,
        tracker,
        decoder,
        detection_engine,
        report_generator,
        event_publisher,
        config.upload.policy(),
    );

    let server = HttpServer::new(server_config, state);

    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
