//! Shared fixtures for repository tests.

use chrono::Utc;
use diesel::RunQueryDsl;
use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use crate::db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle};
use crate::schema::users;
use crate::users::UserDB;

/// A migrated database in a temp dir. Keep the struct alive for the test's duration.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    _dir: TempDir,
}

pub fn test_db() -> TestDb {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("healthpal-test.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");
    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone()).expect("Failed to spawn writer");
    TestDb {
        pool,
        writer,
        _dir: dir,
    }
}

/// Inserts a profile with a fixed id so tests can refer to it.
pub fn insert_user(pool: &DbPool, id: &str, name: &str, role: &str) {
    let now = Utc::now().naive_utc();
    let mut conn = get_connection(pool).expect("Failed to get connection");
    diesel::insert_into(users::table)
        .values(UserDB {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@healthpal.test", id),
            phone: None,
            role: role.to_string(),
            language: "en".to_string(),
            verified: true,
            created_at: now,
            updated_at: now,
        })
        .execute(&mut conn)
        .expect("Failed to insert user");
}
