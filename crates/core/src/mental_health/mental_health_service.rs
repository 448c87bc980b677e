use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::mental_health_model::{
    ChatMessage, ChatSummary, ChatTranscript, MessageView, NewChat, NewMessage, TherapyChat,
};
use super::mental_health_traits::{ChatRepositoryTrait, ChatServiceTrait};
use crate::errors::{Error, Result};
use crate::users::Identity;

/// Runs anonymous counselling chats. Log lines carry chat ids only.
pub struct ChatService {
    repository: Arc<dyn ChatRepositoryTrait>,
}

impl ChatService {
    pub fn new(repository: Arc<dyn ChatRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl ChatServiceTrait for ChatService {
    async fn start_chat(&self, caller: &Identity, new_chat: NewChat) -> Result<ChatSummary> {
        let chat = TherapyChat::start(&caller.user_id, new_chat, Utc::now().naive_utc())?;
        let created = self.repository.create_chat(chat).await?;
        info!("Chat {} started", created.id);
        Ok(created.summary())
    }

    fn transcript(&self, caller: &Identity, chat_id: &str) -> Result<ChatTranscript> {
        let (chat, messages) = self
            .repository
            .load_transcript(chat_id)?
            .ok_or_else(|| Error::not_found("Chat", chat_id))?;
        chat.participant_role(caller)?;
        debug!("Chat {} transcript read ({} messages)", chat.id, messages.len());

        Ok(ChatTranscript {
            chat: chat.summary(),
            messages: messages.iter().map(ChatMessage::view).collect(),
        })
    }

    async fn send_message(
        &self,
        caller: &Identity,
        chat_id: &str,
        new_message: NewMessage,
    ) -> Result<MessageView> {
        new_message.validate()?;
        let message = self
            .repository
            .post_message(chat_id, caller.clone(), new_message)
            .await?;
        debug!(
            "Message {} posted to chat {} as {}",
            message.id,
            message.chat_id,
            message.sender_role.as_str()
        );
        Ok(message.view())
    }
}
