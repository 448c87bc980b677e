//! Database models for user profiles.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::users::User;
use healthpal_core::Result;

use crate::utils::enum_from_column;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub language: String,
    pub verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<UserDB> for User {
    type Error = healthpal_core::Error;

    fn try_from(db: UserDB) -> Result<Self> {
        Ok(Self {
            role: enum_from_column("users.role", &db.role)?,
            language: enum_from_column("users.language", &db.language)?,
            id: db.id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            verified: db.verified,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
