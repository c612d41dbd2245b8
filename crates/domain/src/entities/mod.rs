//! 领域实体定义

pub mod message;
pub mod participant;

pub use message::*;
pub use participant::*;
