pub mod repository;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use crate::models::{Course, NewCourse};

pub use repository::SqliteCourseStore;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Row-level access to the `courses` table.
///
/// `update` and `delete_by_id` report the affected-row count (0 or 1) so
/// callers can tell a missing id apart from a successful write.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
    async fn list_all(&self) -> Result<Vec<Course>, StoreError>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Course>, StoreError>;
    async fn insert(&self, course: &NewCourse) -> Result<i64, StoreError>;
    async fn update(&self, id: i64, course: &NewCourse) -> Result<u64, StoreError>;
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;
}

/// Opens the pool, creating the database file when it does not exist yet.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}
