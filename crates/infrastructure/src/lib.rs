//! 基础设施层实现。
//!
//! 提供领域层存储接口（消息日志、参与者注册表）的内存适配器。

pub mod memory;

pub use memory::{InMemoryMessageLog, InMemoryParticipantRegistry};
