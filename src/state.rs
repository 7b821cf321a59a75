use std::sync::Arc;

use axum::extract::FromRef;
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, UserStore, WinStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserStore>,
    pub wins: Arc<dyn WinStore>,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        match config.database_url.as_deref() {
            Some(url) => {
                let store = Arc::new(PgStore::connect(url, config.db_max_connections).await?);
                store.ensure_schema().await?;
                Ok(Self::from_parts(config, store.clone(), store))
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store, data will not survive a restart");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::from_parts(config, store.clone(), store))
            }
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        wins: Arc<dyn WinStore>,
    ) -> Self {
        let keys = JwtKeys::from(&config.jwt);
        Self {
            config,
            keys,
            users,
            wins,
        }
    }

    /// State over a fresh in-memory store, for tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            database_url: None,
            db_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 15,
            },
        });
        let store = Arc::new(MemoryStore::new());
        Self::from_parts(config, store.clone(), store)
    }
}
