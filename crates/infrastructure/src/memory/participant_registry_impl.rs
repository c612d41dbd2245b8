use async_trait::async_trait;
use domain::{Participant, ParticipantRegistry, RepositoryError, RepositoryResult, Timestamp};

/// 按注册顺序保存参与者的注册表
#[derive(Debug, Default)]
pub struct InMemoryParticipantRegistry {
    participants: Vec<Participant>,
}

impl InMemoryParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.participants
            .iter()
            .position(|participant| participant.name.as_str() == name)
    }
}

#[async_trait]
impl ParticipantRegistry for InMemoryParticipantRegistry {
    async fn register(&mut self, participant: Participant) -> RepositoryResult<()> {
        if self.position(participant.name.as_str()).is_some() {
            return Err(RepositoryError::Conflict);
        }
        self.participants.push(participant);
        Ok(())
    }

    async fn heartbeat(&mut self, name: &str, now: Timestamp) -> RepositoryResult<()> {
        let index = self.position(name).ok_or(RepositoryError::NotFound)?;
        self.participants[index].touch(now);
        Ok(())
    }

    async fn list(&self) -> RepositoryResult<Vec<Participant>> {
        Ok(self.participants.clone())
    }

    async fn find(&self, name: &str) -> RepositoryResult<Option<Participant>> {
        Ok(self.position(name).map(|index| self.participants[index].clone()))
    }

    async fn remove(&mut self, name: &str) -> RepositoryResult<Option<Participant>> {
        Ok(self
            .position(name)
            .map(|index| self.participants.remove(index)))
    }

    async fn is_active(&self, name: &str) -> RepositoryResult<bool> {
        Ok(self.position(name).is_some())
    }
}
