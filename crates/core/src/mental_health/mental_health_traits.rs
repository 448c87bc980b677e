//! Mental-health chat repository and service traits.

use async_trait::async_trait;

use super::mental_health_model::{
    ChatMessage, ChatSummary, ChatTranscript, MessageView, NewChat, NewMessage, TherapyChat,
};
use crate::errors::Result;
use crate::users::Identity;

#[async_trait]
pub trait ChatRepositoryTrait: Send + Sync {
    async fn create_chat(&self, chat: TherapyChat) -> Result<TherapyChat>;

    /// The chat and its messages, oldest first, read in one transaction.
    fn load_transcript(&self, chat_id: &str) -> Result<Option<(TherapyChat, Vec<ChatMessage>)>>;

    /// Loads the chat, applies [`ChatMessage::post`] and saves both in one
    /// write transaction.
    async fn post_message(
        &self,
        chat_id: &str,
        caller: Identity,
        new_message: NewMessage,
    ) -> Result<ChatMessage>;
}

#[async_trait]
pub trait ChatServiceTrait: Send + Sync {
    async fn start_chat(&self, caller: &Identity, new_chat: NewChat) -> Result<ChatSummary>;

    fn transcript(&self, caller: &Identity, chat_id: &str) -> Result<ChatTranscript>;

    async fn send_message(
        &self,
        caller: &Identity,
        chat_id: &str,
        new_message: NewMessage,
    ) -> Result<MessageView>;
}
