use async_trait::async_trait;

use crate::entities::Participant;
use crate::errors::RepositoryResult;
use crate::value_objects::Timestamp;

/// 活跃参与者注册表，以名称为键
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ParticipantRegistry: Send + Sync {
    /// 同名参与者已存在时返回 `RepositoryError::Conflict`
    async fn register(&mut self, participant: Participant) -> RepositoryResult<()>;

    /// 参与者不存在时返回 `RepositoryError::NotFound`
    async fn heartbeat(&mut self, name: &str, now: Timestamp) -> RepositoryResult<()>;

    /// 按注册顺序返回全部参与者
    async fn list(&self) -> RepositoryResult<Vec<Participant>>;

    async fn find(&self, name: &str) -> RepositoryResult<Option<Participant>>;

    /// 返回被移除的参与者
    async fn remove(&mut self, name: &str) -> RepositoryResult<Option<Participant>>;

    async fn is_active(&self, name: &str) -> RepositoryResult<bool>;
}
