//! Persistence for users and wins.
//!
//! Both stores are traits and are handed to the services explicitly:
//! [`PgStore`] in production, [`MemoryStore`] when no database is configured
//! and in tests.

use async_trait::async_trait;
use sqlx::FromRow;
use thiserror::Error;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: Option<String>,
    pub password_hash: Option<String>, // Argon2 PHC string
    // Wallet identities; no login flow uses them yet.
    #[allow(dead_code)]
    pub eth_address: Option<String>,
    #[allow(dead_code)]
    pub sol_address: Option<String>,
}

/// Win record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Win {
    pub id: i64,
    pub date: String,
    pub desc: String,
    pub user_id: i64,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already registered")]
    Conflict(&'static str),

    #[error("user {0} does not exist")]
    UnknownUser(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Conflict`] if the email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait WinStore: Send + Sync {
    /// Insert a win owned by `user_id`. Fails with [`StoreError::UnknownUser`]
    /// if no such user exists.
    async fn create_win(&self, user_id: i64, date: &str, desc: &str) -> StoreResult<Win>;

    /// All wins of one user, in insertion order.
    async fn find_all_by_user(&self, user_id: i64) -> StoreResult<Vec<Win>>;
}
