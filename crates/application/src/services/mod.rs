mod message_service;
mod participant_service;

#[cfg(test)]
mod fixtures;

pub use message_service::{
    MessageLimit, MessageService, MessageServiceDependencies, PostMessageRequest,
    UpdateMessageRequest,
};
pub use participant_service::{ParticipantService, ParticipantServiceDependencies};
