use async_trait::async_trait;

use crate::entities::{Message, MessageDraft, MessagePatch};
use crate::errors::RepositoryResult;
use crate::value_objects::{Sequence, Timestamp};

/// 只追加、全局有序的消息日志
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// 分配下一个序列号并保存消息。
    ///
    /// 序列号从 1 开始严格递增，删除后也不会复用。
    async fn append(&mut self, draft: MessageDraft, at: Timestamp) -> RepositoryResult<Message>;

    /// 按序列号升序返回全部消息的快照
    async fn query(&self) -> RepositoryResult<Vec<Message>>;

    async fn find(&self, sequence: Sequence) -> RepositoryResult<Option<Message>>;

    /// 仅当消息存在且发送者为 `owner` 时删除，返回是否删除
    async fn delete_owned(&mut self, sequence: Sequence, owner: &str) -> RepositoryResult<bool>;

    /// 仅当消息存在且发送者为 `owner` 时原地替换 `to/text/kind`，返回是否匹配
    async fn update_owned(
        &mut self,
        sequence: Sequence,
        owner: &str,
        patch: MessagePatch,
    ) -> RepositoryResult<bool>;
}
