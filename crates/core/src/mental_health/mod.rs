//! Mental-health module - anonymous chats between users and counselors.

mod mental_health_model;
mod mental_health_service;
mod mental_health_traits;

pub use mental_health_model::{
    ChatMessage, ChatStatus, ChatSummary, ChatTranscript, MessageView, NewChat, NewMessage,
    SenderRole, TherapyChat,
};
pub use mental_health_service::ChatService;
pub use mental_health_traits::{ChatRepositoryTrait, ChatServiceTrait};
