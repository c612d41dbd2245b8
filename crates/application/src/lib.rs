//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：参与者进入房间与心跳、消息的发送/读取/修改/删除，
//! 以及定时清理不活跃参与者的在线状态任务。跨资源的一致性由 `RoomStore` 统一保证。

pub mod clock;
pub mod error;
pub mod presence;
pub mod services;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ApplicationError;
pub use presence::{PresenceSweeper, SweepReport, SweeperConfig, SweeperHandle};
pub use services::{
    MessageLimit, MessageService, MessageServiceDependencies, ParticipantService,
    ParticipantServiceDependencies, PostMessageRequest, UpdateMessageRequest,
};
pub use store::{RoomState, RoomStore};
