//! SQLite storage implementation for user profiles.

mod model;
mod repository;

pub use model::UserDB;
pub use repository::UserRepository;
