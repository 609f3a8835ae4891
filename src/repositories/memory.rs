use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::user_repository::{RepositoryError, UserRepository};
use crate::models::User;

/// Process-local stand-in for the `users` table.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    users: BTreeMap<i32, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, name: &str, dob: NaiveDate) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;

        let id = state
            .last_id
            .checked_add(1)
            .ok_or(RepositoryError::SequenceExhausted)?;
        let now = Utc::now();
        let user = User {
            id,
            name: name.to_string(),
            dob,
            created_at: now,
            updated_at: now,
        };

        state.last_id = id;
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError> {
        self.state
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let mut users: Vec<User> = self.state.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn update(&self, id: i32, name: &str, dob: NaiveDate) -> Result<User, RepositoryError> {
        let mut state = self.state.write().await;
        let user = state.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        user.name = name.to_string();
        user.dob = dob;
        user.updated_at = Utc::now().max(user.created_at);

        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        self.state
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}
