//! 消息实体定义
//!
//! 包含消息的核心信息、可见性规则，以及进入/离开房间的系统消息。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};
use crate::value_objects::{ParticipantName, Sequence, Timestamp};

/// 广播接收者，所有参与者可见
pub const BROADCAST_RECIPIENT: &str = "Todos";

/// 进入房间的系统消息文本
pub const JOINED_TEXT: &str = "Entra na sala...";

/// 离开房间的系统消息文本
pub const LEFT_TEXT: &str = "Sai da sala...";

/// 消息类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// 系统生成的进入/离开消息
    Status,
    /// 普通消息
    Message,
    /// 私信
    PrivateMessage,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Status => "status",
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
        }
    }

    /// 参与者只能发送普通消息和私信，`status` 由系统生成
    pub fn is_user_postable(self) -> bool {
        matches!(self, MessageKind::Message | MessageKind::PrivateMessage)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "status" => Ok(MessageKind::Status),
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            other => Err(DomainError::validation(
                "type",
                format!("unknown message type `{other}`"),
            )),
        }
    }
}

/// 待写入日志的消息，序列号和时间由日志在追加时分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

impl MessageDraft {
    /// 创建参与者发送的消息，校验接收者、内容和类型
    pub fn from_participant(
        from: &ParticipantName,
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> DomainResult<Self> {
        let patch = MessagePatch::new(to, text, kind)?;
        Ok(Self {
            from: from.as_str().to_owned(),
            to: patch.to,
            text: patch.text,
            kind: patch.kind,
        })
    }

    /// 进入房间的系统消息
    pub fn joined(name: &ParticipantName) -> Self {
        Self::status(name, JOINED_TEXT)
    }

    /// 离开房间的系统消息
    pub fn left(name: &ParticipantName) -> Self {
        Self::status(name, LEFT_TEXT)
    }

    fn status(name: &ParticipantName, text: &str) -> Self {
        Self {
            from: name.as_str().to_owned(),
            to: BROADCAST_RECIPIENT.to_owned(),
            text: text.to_owned(),
            kind: MessageKind::Status,
        }
    }
}

/// 消息可修改的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePatch {
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

impl MessagePatch {
    pub fn new(
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> DomainResult<Self> {
        let to = to.into();
        let text = text.into();

        if to.is_empty() {
            return Err(DomainError::validation("to", "接收者不能为空"));
        }
        if text.is_empty() {
            return Err(DomainError::validation("text", "消息内容不能为空"));
        }
        if !kind.is_user_postable() {
            return Err(DomainError::validation(
                "type",
                "只能发送 message 或 private_message",
            ));
        }

        Ok(Self { to, text, kind })
    }
}

/// 消息实体
///
/// 排序永远以 `sequence` 为准，`time` 只是追加时刻的 `HH:MM:SS` 展示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sequence: Sequence,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl Message {
    /// 由日志在追加时调用
    pub fn from_draft(sequence: Sequence, draft: MessageDraft, appended_at: Timestamp) -> Self {
        Self {
            sequence,
            from: draft.from,
            to: draft.to,
            text: draft.text,
            kind: draft.kind,
            time: format_clock_time(appended_at),
        }
    }

    /// 广播消息和发给该参与者的消息可见
    pub fn is_visible_to(&self, consumer: &str) -> bool {
        self.to == consumer || self.to == BROADCAST_RECIPIENT
    }

    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.from == owner
    }

    pub fn apply(&mut self, patch: MessagePatch) {
        self.to = patch.to;
        self.text = patch.text;
        self.kind = patch.kind;
    }
}

/// 以 `HH:MM:SS` 展示时间戳
pub fn format_clock_time(at: Timestamp) -> String {
    at.format("%H:%M:%S").to_string()
}
