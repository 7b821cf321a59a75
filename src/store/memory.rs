use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{StoreError, StoreResult, User, UserStore, Win, WinStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    wins: Vec<Win>,
}

/// Process-local store with the same uniqueness and ownership rules as the
/// Postgres schema. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email.as_deref() == Some(email)) {
            return Err(StoreError::Conflict("email"));
        }
        let user = User {
            id: tables.users.len() as i64 + 1,
            email: Some(email.to_owned()),
            password_hash: Some(password_hash.to_owned()),
            eth_address: None,
            sol_address: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }
}

#[async_trait]
impl WinStore for MemoryStore {
    async fn create_win(&self, user_id: i64, date: &str, desc: &str) -> StoreResult<Win> {
        let mut tables = self.tables();
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::UnknownUser(user_id));
        }
        let win = Win {
            id: tables.wins.len() as i64 + 1,
            date: date.to_owned(),
            desc: desc.to_owned(),
            user_id,
        };
        tables.wins.push(win.clone());
        Ok(win)
    }

    async fn find_all_by_user(&self, user_id: i64) -> StoreResult<Vec<Win>> {
        Ok(self
            .tables()
            .wins
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }
}
