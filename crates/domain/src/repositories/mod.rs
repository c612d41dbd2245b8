//! 存储协作方接口定义
//!
//! 定义数据访问层的抽象接口，内层定义接口，外层实现接口。
//! 接口本身不提供跨资源事务，写操作的互斥由应用层统一负责。

pub mod message_log;
pub mod participant_registry;

pub use message_log::MessageLog;
pub use participant_registry::ParticipantRegistry;

#[cfg(feature = "testing")]
pub use message_log::MockMessageLog;
#[cfg(feature = "testing")]
pub use participant_registry::MockParticipantRegistry;
