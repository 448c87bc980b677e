//! SQLite storage implementation for mental-health chats.

mod model;
mod repository;

pub use model::{ChatMessageDB, TherapyChatDB};
pub use repository::ChatRepository;
