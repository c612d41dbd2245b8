//! 聊天室核心领域模型
//!
//! 包含参与者、消息等核心实体，存储协作方（消息日志、参与者注册表）的抽象接口，
//! 以及相关的错误类型。

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

// 重新导出常用类型
pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use value_objects::*;
