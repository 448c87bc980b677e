//! Database models for therapy chats and their messages.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::mental_health::{ChatMessage, TherapyChat};
use healthpal_core::Result;

use crate::utils::enum_from_column;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::therapy_chats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TherapyChatDB {
    pub id: String,
    pub user_id: String,
    pub counselor_id: Option<String>,
    pub topic: Option<String>,
    pub is_anonymous: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TherapyChatDB> for TherapyChat {
    type Error = healthpal_core::Error;

    fn try_from(db: TherapyChatDB) -> Result<Self> {
        Ok(Self {
            status: enum_from_column("therapy_chats.status", &db.status)?,
            id: db.id,
            user_id: db.user_id,
            counselor_id: db.counselor_id,
            topic: db.topic,
            is_anonymous: db.is_anonymous,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<TherapyChat> for TherapyChatDB {
    fn from(domain: TherapyChat) -> Self {
        Self {
            id: domain.id,
            user_id: domain.user_id,
            counselor_id: domain.counselor_id,
            topic: domain.topic,
            is_anonymous: domain.is_anonymous,
            status: domain.status.as_str().to_string(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

/// Messages are insert-only.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::chat_messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChatMessageDB {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_role: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ChatMessageDB> for ChatMessage {
    type Error = healthpal_core::Error;

    fn try_from(db: ChatMessageDB) -> Result<Self> {
        Ok(Self {
            sender_role: enum_from_column("chat_messages.sender_role", &db.sender_role)?,
            id: db.id,
            chat_id: db.chat_id,
            sender_id: db.sender_id,
            content: db.content,
            created_at: db.created_at,
        })
    }
}

impl From<&ChatMessage> for ChatMessageDB {
    fn from(domain: &ChatMessage) -> Self {
        Self {
            id: domain.id.clone(),
            chat_id: domain.chat_id.clone(),
            sender_id: domain.sender_id.clone(),
            sender_role: domain.sender_role.as_str().to_string(),
            content: domain.content.clone(),
            created_at: domain.created_at,
        }
    }
}
