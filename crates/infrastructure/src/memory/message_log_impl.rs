use async_trait::async_trait;
use domain::{
    Message, MessageDraft, MessageLog, MessagePatch, RepositoryResult, Sequence, Timestamp,
};

/// 基于 `Vec` 的消息日志，消息按序列号升序存放
#[derive(Debug)]
pub struct InMemoryMessageLog {
    messages: Vec<Message>,
    next_sequence: Sequence,
}

impl Default for InMemoryMessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_sequence: Sequence::FIRST,
        }
    }

    fn position(&self, sequence: Sequence) -> Option<usize> {
        self.messages
            .binary_search_by_key(&sequence, |message| message.sequence)
            .ok()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&mut self, draft: MessageDraft, at: Timestamp) -> RepositoryResult<Message> {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.next();

        let message = Message::from_draft(sequence, draft, at);
        self.messages.push(message.clone());
        Ok(message)
    }

    async fn query(&self) -> RepositoryResult<Vec<Message>> {
        Ok(self.messages.clone())
    }

    async fn find(&self, sequence: Sequence) -> RepositoryResult<Option<Message>> {
        Ok(self.position(sequence).map(|index| self.messages[index].clone()))
    }

    async fn delete_owned(&mut self, sequence: Sequence, owner: &str) -> RepositoryResult<bool> {
        match self.position(sequence) {
            Some(index) if self.messages[index].is_owned_by(owner) => {
                self.messages.remove(index);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn update_owned(
        &mut self,
        sequence: Sequence,
        owner: &str,
        patch: MessagePatch,
    ) -> RepositoryResult<bool> {
        match self.position(sequence) {
            Some(index) if self.messages[index].is_owned_by(owner) => {
                self.messages[index].apply(patch);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
