use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::errors::{DatabaseError, Error};
use healthpal_core::mental_health::{ChatMessage, ChatRepositoryTrait, NewMessage, TherapyChat};
use healthpal_core::users::Identity;
use healthpal_core::Result;

use super::model::{ChatMessageDB, TherapyChatDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{chat_messages, therapy_chats};

pub struct ChatRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ChatRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn find_chat(conn: &mut SqliteConnection, chat_id: &str) -> Result<Option<TherapyChat>> {
    therapy_chats::table
        .find(chat_id)
        .select(TherapyChatDB::as_select())
        .first::<TherapyChatDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(TherapyChat::try_from)
        .transpose()
}

fn post_in_tx(
    conn: &mut SqliteConnection,
    chat_id: &str,
    caller: &Identity,
    new_message: &NewMessage,
) -> Result<ChatMessage> {
    let mut chat =
        find_chat(conn, chat_id)?.ok_or_else(|| Error::not_found("Chat", chat_id))?;

    let message = ChatMessage::post(&mut chat, caller, new_message, Utc::now().naive_utc())?;

    diesel::insert_into(chat_messages::table)
        .values(ChatMessageDB::from(&message))
        .execute(conn)
        .map_err(StorageError::from)?;

    let updated = diesel::update(therapy_chats::table.find(&chat.id))
        .set((
            therapy_chats::counselor_id.eq(&chat.counselor_id),
            therapy_chats::updated_at.eq(chat.updated_at),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    if updated != 1 {
        return Err(Error::Database(DatabaseError::Internal(format!(
            "Expected to update chat '{}', updated {} rows",
            chat.id, updated
        ))));
    }
    Ok(message)
}

#[async_trait]
impl ChatRepositoryTrait for ChatRepository {
    async fn create_chat(&self, chat: TherapyChat) -> Result<TherapyChat> {
        let row = TherapyChatDB::from(chat);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TherapyChat> {
                let inserted = diesel::insert_into(therapy_chats::table)
                    .values(&row)
                    .returning(TherapyChatDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                TherapyChat::try_from(inserted)
            })
            .await
    }

    fn load_transcript(&self, chat_id: &str) -> Result<Option<(TherapyChat, Vec<ChatMessage>)>> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            let Some(chat) = find_chat(c, chat_id)? else {
                return Ok(None);
            };
            let messages = chat_messages::table
                .filter(chat_messages::chat_id.eq(chat_id))
                .order((chat_messages::created_at.asc(), chat_messages::id.asc()))
                .select(ChatMessageDB::as_select())
                .load::<ChatMessageDB>(c)?
                .into_iter()
                .map(ChatMessage::try_from)
                .collect::<Result<Vec<_>>>()?;
            Ok(Some((chat, messages)))
        })
        .map_err(Error::from)
    }

    async fn post_message(
        &self,
        chat_id: &str,
        caller: Identity,
        new_message: NewMessage,
    ) -> Result<ChatMessage> {
        let chat_id = chat_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ChatMessage> {
                post_in_tx(conn, &chat_id, &caller, &new_message)
            })
            .await
    }
}
