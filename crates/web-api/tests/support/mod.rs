use std::{net::SocketAddr, sync::Arc};

use application::{
    ManualClock, MessageService, MessageServiceDependencies, ParticipantService,
    ParticipantServiceDependencies, PresenceSweeper, RoomStore, SweeperConfig,
};
use chrono::{TimeZone, Utc};
use infrastructure::{InMemoryMessageLog, InMemoryParticipantRegistry};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use web_api::{router, AppState};

pub struct TestServer {
    pub base_url: String,
    pub clock: Arc<ManualClock>,
    pub sweeper: PresenceSweeper,
    shutdown: CancellationToken,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub async fn spawn_server() -> TestServer {
    let store = Arc::new(RoomStore::new(
        InMemoryMessageLog::new(),
        InMemoryParticipantRegistry::new(),
    ));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));

    let participant_service = Arc::new(ParticipantService::new(ParticipantServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    }));
    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    }));
    let sweeper = PresenceSweeper::new(store, clock.clone(), SweeperConfig::default());

    let app = router(AppState::new(participant_service, message_service));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr: SocketAddr = listener.local_addr().expect("addr");
    let shutdown = CancellationToken::new();

    let token = shutdown.clone();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
            .ok();
    });

    TestServer {
        base_url: format!("http://{}", addr),
        clock,
        sweeper,
        shutdown,
    }
}
