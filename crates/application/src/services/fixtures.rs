//! 服务测试共用的测试环境

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use domain::Timestamp;
use infrastructure::{InMemoryMessageLog, InMemoryParticipantRegistry};

use crate::{
    clock::{Clock, ManualClock},
    services::{
        MessageService, MessageServiceDependencies, ParticipantService,
        ParticipantServiceDependencies, PostMessageRequest,
    },
    store::RoomStore,
};

pub(crate) struct TestRoom {
    pub store: Arc<RoomStore>,
    pub clock: Arc<ManualClock>,
    pub participants: ParticipantService,
    pub messages: MessageService,
}

impl TestRoom {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }
}

pub(crate) fn test_room() -> TestRoom {
    let store = Arc::new(RoomStore::new(
        InMemoryMessageLog::new(),
        InMemoryParticipantRegistry::new(),
    ));
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    ));

    let participants = ParticipantService::new(ParticipantServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    });
    let messages = MessageService::new(MessageServiceDependencies {
        store: store.clone(),
        clock: clock.clone(),
    });

    TestRoom {
        store,
        clock,
        participants,
        messages,
    }
}

pub(crate) fn post_request(sender: &str, to: &str, text: &str, kind: &str) -> PostMessageRequest {
    PostMessageRequest {
        sender: sender.to_owned(),
        to: to.to_owned(),
        text: text.to_owned(),
        kind: kind.to_owned(),
    }
}
