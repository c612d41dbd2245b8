use std::sync::Arc;

use domain::{DomainError, MessageDraft, Participant, ParticipantName, RepositoryError};

use crate::{clock::Clock, error::ApplicationError, store::RoomStore};

pub struct ParticipantServiceDependencies {
    pub store: Arc<RoomStore>,
    pub clock: Arc<dyn Clock>,
}

pub struct ParticipantService {
    deps: ParticipantServiceDependencies,
}

impl ParticipantService {
    pub fn new(deps: ParticipantServiceDependencies) -> Self {
        Self { deps }
    }

    /// 进入房间：注册参与者并广播进入消息，两者在同一临界区内完成
    pub async fn join(&self, name: impl Into<String>) -> Result<Participant, ApplicationError> {
        let name = ParticipantName::parse(name)?;

        let mut state = self.deps.store.write().await;
        let now = self.deps.clock.now();
        let participant = Participant::new(name.clone(), now);

        match state.participants.register(participant.clone()).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict) => {
                return Err(DomainError::ParticipantAlreadyExists {
                    name: name.into_inner(),
                }
                .into());
            }
            Err(err) => return Err(err.into()),
        }

        if let Err(err) = state.messages.append(MessageDraft::joined(&name), now).await {
            // 进入消息写入失败时撤销注册
            if let Err(rollback_err) = state.participants.remove(name.as_str()).await {
                tracing::error!(
                    participant = %name,
                    error = %rollback_err,
                    "撤销参与者注册失败"
                );
            }
            tracing::error!(participant = %name, error = %err, "写入进入消息失败");
            return Err(err.into());
        }

        tracing::info!(participant = %name, "参与者进入房间");
        Ok(participant)
    }

    /// 刷新心跳，时间取调用时刻
    pub async fn heartbeat(&self, name: &str) -> Result<(), ApplicationError> {
        let mut state = self.deps.store.write().await;
        let now = self.deps.clock.now();

        match state.participants.heartbeat(name, now).await {
            Ok(()) => {
                tracing::debug!(participant = %name, "心跳已刷新");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(DomainError::ParticipantNotFound {
                name: name.to_owned(),
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Participant>, ApplicationError> {
        let state = self.deps.store.read().await;
        let participants = state.participants.list().await?;
        Ok(participants)
    }
}
