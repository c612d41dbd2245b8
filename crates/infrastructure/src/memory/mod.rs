//! 内存存储实现
//!
//! 这些实现本身不加锁，调用方（应用层的 `RoomStore`）负责串行化写操作。

mod message_log_impl;
mod participant_registry_impl;

pub use message_log_impl::InMemoryMessageLog;
pub use participant_registry_impl::InMemoryParticipantRegistry;
