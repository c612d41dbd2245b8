//! 领域模型错误定义
//!
//! 定义了系统中所有可能的错误类型，提供清晰的错误上下文。

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 输入字段缺失或格式不正确
    #[error("验证失败: {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// 参与者不存在（或已被清理）
    #[error("参与者不存在: {name}")]
    ParticipantNotFound { name: String },

    /// 同名参与者已在房间中
    #[error("参与者已存在: {name}")]
    ParticipantAlreadyExists { name: String },

    /// 发送者不是活跃参与者
    #[error("发送者不在房间中: {name}")]
    SenderNotActive { name: String },

    /// 消息不存在
    #[error("消息不存在: {sequence}")]
    MessageNotFound { sequence: u64 },

    /// 只有消息的发送者可以修改或删除消息
    #[error("无权操作消息: {sequence}")]
    NotMessageOwner { sequence: u64 },
}

impl DomainError {
    /// 创建验证错误
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 存储协作方错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("记录不存在")]
    NotFound,
    #[error("记录已存在")]
    Conflict,
    #[error("存储错误: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

/// 存储层结果类型
pub type RepositoryResult<T> = Result<T, RepositoryError>;
