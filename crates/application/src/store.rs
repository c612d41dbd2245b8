//! 房间状态
//!
//! 消息日志和参与者注册表放在同一把读写锁之后：
//! 所有写操作持有写锁，进入房间（注册 + 进入消息）和清理（移除 + 离开消息）
//! 在同一个写锁临界区内完成，读者不会看到只完成一半的状态。

use domain::{MessageLog, ParticipantRegistry};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct RoomState {
    pub messages: Box<dyn MessageLog>,
    pub participants: Box<dyn ParticipantRegistry>,
}

pub struct RoomStore {
    state: RwLock<RoomState>,
}

impl RoomStore {
    pub fn new(
        messages: impl MessageLog + 'static,
        participants: impl ParticipantRegistry + 'static,
    ) -> Self {
        Self {
            state: RwLock::new(RoomState {
                messages: Box::new(messages),
                participants: Box::new(participants),
            }),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, RoomState> {
        self.state.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, RoomState> {
        self.state.write().await
    }
}
