use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use super::{StoreError, StoreResult, User, UserStore, Win, WinStore};

const CREATE_TABLES: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS "user" (
        id            BIGSERIAL PRIMARY KEY,
        email         VARCHAR(120) UNIQUE,
        password_hash VARCHAR(255),
        eth_address   VARCHAR(64) UNIQUE,
        sol_address   VARCHAR(64) UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS win (
        id      BIGSERIAL PRIMARY KEY,
        date    VARCHAR(32) NOT NULL,
        "desc"  VARCHAR(256) NOT NULL,
        user_id BIGINT NOT NULL REFERENCES "user" (id)
    )
    "#,
];

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self::new(db))
    }

    /// Create both tables if they are missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        for ddl in CREATE_TABLES {
            sqlx::query(ddl)
                .execute(&self.db)
                .await
                .context("create tables")?;
        }
        info!("database schema ready");
        Ok(())
    }
}

fn map_db_error(err: sqlx::Error, user_id: Option<i64>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Conflict("email");
        }
        if let (true, Some(id)) = (db_err.is_foreign_key_violation(), user_id) {
            return StoreError::UnknownUser(id);
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, eth_address, sol_address
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, None))?;
        debug!(user_id = user.id, "user row inserted");
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, eth_address, sol_address
            FROM "user"
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl WinStore for PgStore {
    async fn create_win(&self, user_id: i64, date: &str, desc: &str) -> StoreResult<Win> {
        let win = sqlx::query_as::<_, Win>(
            r#"
            INSERT INTO win (date, "desc", user_id)
            VALUES ($1, $2, $3)
            RETURNING id, date, "desc", user_id
            "#,
        )
        .bind(date)
        .bind(desc)
        .bind(user_id)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, Some(user_id)))?;
        debug!(win_id = win.id, user_id, "win row inserted");
        Ok(win)
    }

    async fn find_all_by_user(&self, user_id: i64) -> StoreResult<Vec<Win>> {
        let rows = sqlx::query_as::<_, Win>(
            r#"
            SELECT id, date, "desc", user_id
            FROM win
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
