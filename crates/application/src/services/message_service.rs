use std::sync::Arc;

use domain::{
    DomainError, Message, MessageDraft, MessageKind, MessagePatch, ParticipantName, Sequence,
};

use crate::{clock::Clock, error::ApplicationError, store::RoomStore};

#[derive(Debug, Clone)]
pub struct PostMessageRequest {
    pub sender: String,
    pub to: String,
    pub text: String,
    pub kind: String,
}

#[derive(Debug, Clone)]
pub struct UpdateMessageRequest {
    pub sequence: Sequence,
    pub owner: String,
    pub to: String,
    pub text: String,
    pub kind: String,
}

/// 读取消息时保留的最近消息条数
///
/// 缺失、非数字或不大于 0 的值都表示不限制。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageLimit(Option<usize>);

impl MessageLimit {
    pub const UNLIMITED: MessageLimit = MessageLimit(None);

    pub fn new(limit: i64) -> Self {
        match usize::try_from(limit) {
            Ok(limit) if limit > 0 => Self(Some(limit)),
            _ => Self::UNLIMITED,
        }
    }

    /// 按开头的整数部分解析，`"2abc"` 与 `"2.5"` 都视为 2。
    ///
    /// 没有整数前缀或结果不为正数时不限制。
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(leading_integer)
            .map(Self::new)
            .unwrap_or(Self::UNLIMITED)
    }

    pub fn get(self) -> Option<usize> {
        self.0
    }

    /// 保留最后 `limit` 条，窗口内保持升序
    fn apply(self, mut messages: Vec<Message>) -> Vec<Message> {
        match self.0 {
            Some(limit) => {
                let start = messages.len().saturating_sub(limit);
                messages.split_off(start)
            }
            None => messages,
        }
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let value = raw.trim_start();
    let digits_start = usize::from(value.starts_with(&['+', '-'][..]));
    let digits_end = value[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value.len(), |offset| digits_start + offset);
    if digits_end == digits_start {
        return None;
    }
    value[..digits_end].parse().ok()
}

pub struct MessageServiceDependencies {
    pub store: Arc<RoomStore>,
    pub clock: Arc<dyn Clock>,
}

pub struct MessageService {
    deps: MessageServiceDependencies,
}

impl MessageService {
    pub fn new(deps: MessageServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn post(&self, request: PostMessageRequest) -> Result<Message, ApplicationError> {
        let kind: MessageKind = request.kind.parse()?;
        let sender = ParticipantName::parse(request.sender.as_str()).map_err(|_| {
            DomainError::SenderNotActive {
                name: request.sender.clone(),
            }
        })?;
        let draft = MessageDraft::from_participant(&sender, request.to, request.text, kind)?;

        let mut state = self.deps.store.write().await;
        if !state.participants.is_active(sender.as_str()).await? {
            return Err(DomainError::SenderNotActive {
                name: sender.into_inner(),
            }
            .into());
        }

        let now = self.deps.clock.now();
        let message = state.messages.append(draft, now).await?;

        tracing::info!(
            sequence = %message.sequence,
            from = %message.from,
            to = %message.to,
            kind = %message.kind,
            "消息已发送"
        );
        Ok(message)
    }

    /// 返回对 `consumer` 可见的消息，按序列号升序
    pub async fn read(
        &self,
        consumer: &str,
        limit: MessageLimit,
    ) -> Result<Vec<Message>, ApplicationError> {
        let messages = self.deps.store.read().await.messages.query().await?;

        let visible = messages
            .into_iter()
            .filter(|message| message.is_visible_to(consumer))
            .collect();
        Ok(limit.apply(visible))
    }

    pub async fn delete(&self, sequence: Sequence, owner: &str) -> Result<(), ApplicationError> {
        let mut state = self.deps.store.write().await;
        Self::check_ownership(state.messages.find(sequence).await?, sequence, owner)?;

        if !state.messages.delete_owned(sequence, owner).await? {
            return Err(DomainError::MessageNotFound {
                sequence: sequence.value(),
            }
            .into());
        }

        tracing::info!(sequence = %sequence, owner = %owner, "消息已删除");
        Ok(())
    }

    pub async fn update(&self, request: UpdateMessageRequest) -> Result<Message, ApplicationError> {
        let kind: MessageKind = request.kind.parse()?;
        let patch = MessagePatch::new(request.to, request.text, kind)?;
        let sequence = request.sequence;
        let owner = request.owner.as_str();

        let mut state = self.deps.store.write().await;
        Self::check_ownership(state.messages.find(sequence).await?, sequence, owner)?;

        if !state.messages.update_owned(sequence, owner, patch).await? {
            return Err(DomainError::MessageNotFound {
                sequence: sequence.value(),
            }
            .into());
        }

        let updated = state
            .messages
            .find(sequence)
            .await?
            .ok_or(DomainError::MessageNotFound {
                sequence: sequence.value(),
            })?;

        tracing::info!(sequence = %sequence, owner = %owner, "消息已更新");
        Ok(updated)
    }

    /// 区分消息不存在与非发送者操作
    fn check_ownership(
        message: Option<Message>,
        sequence: Sequence,
        owner: &str,
    ) -> Result<(), DomainError> {
        match message {
            None => Err(DomainError::MessageNotFound {
                sequence: sequence.value(),
            }),
            Some(message) if !message.is_owned_by(owner) => {
                tracing::warn!(
                    sequence = %sequence,
                    owner = %owner,
                    sender = %message.from,
                    "非发送者尝试修改消息"
                );
                Err(DomainError::NotMessageOwner {
                    sequence: sequence.value(),
                })
            }
            Some(_) => Ok(()),
        }
    }
}
