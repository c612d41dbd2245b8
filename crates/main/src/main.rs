//! 主应用程序入口
//!
//! 启动 Axum Web API 服务和在线状态清理任务。

use std::sync::Arc;

use application::{
    Clock, MessageService, MessageServiceDependencies, ParticipantService,
    ParticipantServiceDependencies, PresenceSweeper, RoomStore, SweeperConfig, SystemClock,
};
use config::AppConfig;
use infrastructure::{InMemoryMessageLog, InMemoryParticipantRegistry};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    // 房间状态：消息日志和参与者注册表共用一把锁
    let store = Arc::new(RoomStore::new(
        InMemoryMessageLog::new(),
        InMemoryParticipantRegistry::new(),
    ));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let participant_service = Arc::new(ParticipantService::new(ParticipantServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    }));
    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    }));

    let sweeper_config = SweeperConfig {
        interval: config.presence.sweep_interval(),
        staleness_timeout: chrono::Duration::from_std(config.presence.staleness_timeout())?,
    };
    let shutdown = CancellationToken::new();
    let sweeper =
        Arc::new(PresenceSweeper::new(store, clock, sweeper_config)).spawn(shutdown.clone());

    let app = router(AppState::new(participant_service, message_service));
    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!("聊天室服务器启动在 http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    sweeper.shutdown().await;
    tracing::info!("聊天室服务器已关闭");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::error!(error = %err, "监听关闭信号失败");
            }
            tracing::info!("收到关闭信号");
        }
        _ = shutdown.cancelled() => {}
    }
}
