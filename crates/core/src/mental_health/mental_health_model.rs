//! Anonymous counselling chats and their messages.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{CHAT_MESSAGE_MAX_LEN, CHAT_TOPIC_MAX_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::users::{Identity, Role};
use crate::utils::{check_max_len, optional_text, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Active,
    Closed,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Active => "active",
            ChatStatus::Closed => "closed",
        }
    }
}

impl FromStr for ChatStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(ChatStatus::Active),
            "closed" => Ok(ChatStatus::Closed),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown chat status '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    User,
    Counselor,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::User => "user",
            SenderRole::Counselor => "counselor",
        }
    }
}

impl FromStr for SenderRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(SenderRole::User),
            "counselor" => Ok(SenderRole::Counselor),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown sender role '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A counselling session. The owner's id never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct TherapyChat {
    pub id: String,
    pub user_id: String,
    pub counselor_id: Option<String>,
    pub topic: Option<String>,
    pub is_anonymous: bool,
    pub status: ChatStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewChat {
    pub topic: Option<String>,
}

impl TherapyChat {
    pub fn start(user_id: &str, new_chat: NewChat, now: NaiveDateTime) -> Result<Self> {
        let user_id = required_text(Some(user_id), "user_id")?;
        let topic = optional_text(new_chat.topic.as_deref());
        if let Some(topic) = &topic {
            check_max_len(topic, "topic", CHAT_TOPIC_MAX_LEN)?;
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            counselor_id: None,
            topic,
            is_anonymous: true,
            status: ChatStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// How `caller` takes part in this chat.
    ///
    /// The owner speaks as the user. Doctors speak as counselors until one
    /// of them is assigned; after that only the assigned doctor may.
    pub fn participant_role(&self, caller: &Identity) -> Result<SenderRole> {
        if caller.user_id == self.user_id {
            return Ok(SenderRole::User);
        }
        if caller.role == Role::Doctor
            && self
                .counselor_id
                .as_deref()
                .map_or(true, |assigned| assigned == caller.user_id)
        {
            return Ok(SenderRole::Counselor);
        }
        Err(Error::permission_denied("Not a participant in this chat"))
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            topic: self.topic.clone(),
            status: self.status,
            is_anonymous: self.is_anonymous,
            counselor_assigned: self.counselor_id.is_some(),
            created_at: self.created_at,
        }
    }
}

/// What participants see of a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSummary {
    pub id: String,
    pub topic: Option<String>,
    pub status: ChatStatus,
    pub is_anonymous: bool,
    pub counselor_assigned: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_role: SenderRole,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewMessage {
    pub content: Option<String>,
}

impl NewMessage {
    pub fn validate(&self) -> Result<()> {
        let content = required_text(self.content.as_deref(), "content")?;
        check_max_len(content, "content", CHAT_MESSAGE_MAX_LEN)
    }
}

impl ChatMessage {
    /// Builds `caller`'s message for `chat`. The first doctor to reply becomes
    /// the chat's counselor, so `chat` must be saved along with the message.
    pub fn post(
        chat: &mut TherapyChat,
        caller: &Identity,
        new_message: &NewMessage,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let sender_role = chat.participant_role(caller)?;
        new_message.validate()?;
        if chat.status == ChatStatus::Closed {
            return Err(ValidationError::InvalidInput("Chat is closed".to_string()).into());
        }
        let content = required_text(new_message.content.as_deref(), "content")?;

        if sender_role == SenderRole::Counselor && chat.counselor_id.is_none() {
            chat.counselor_id = Some(caller.user_id.clone());
        }
        chat.updated_at = now;

        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            chat_id: chat.id.clone(),
            sender_id: caller.user_id.clone(),
            sender_role,
            content: content.to_string(),
            created_at: now,
        })
    }

    pub fn view(&self) -> MessageView {
        MessageView {
            id: self.id.clone(),
            content: self.content.clone(),
            sender_role: self.sender_role,
            created_at: self.created_at,
        }
    }
}

/// A message as shown to participants, without the sender's id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub sender_role: SenderRole,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTranscript {
    pub chat: ChatSummary,
    /// Oldest first.
    pub messages: Vec<MessageView>,
}
