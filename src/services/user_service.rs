use std::sync::Arc;

use chrono::Utc;

use crate::models::{UserInput, UserResponse};
use crate::repositories::{RepositoryError, UserRepository};

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_user(&self, input: UserInput) -> Result<UserResponse, RepositoryError> {
        tracing::debug!(name = %input.name, dob = %input.dob, "creating user");

        let user = self.repository.create(&input.name, input.dob).await?;
        Ok(user.to_response())
    }

    pub async fn get_user(&self, id: i32) -> Result<UserResponse, RepositoryError> {
        tracing::debug!(user_id = id, "fetching user");

        let user = self.repository.get_by_id(id).await?;
        Ok(user.to_response())
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, RepositoryError> {
        let users = self.repository.list().await?;
        let today = Utc::now().date_naive();

        tracing::debug!(count = users.len(), "fetched users");
        Ok(users.iter().map(|u| u.to_response_on(today)).collect())
    }

    pub async fn update_user(&self, id: i32, input: UserInput) -> Result<UserResponse, RepositoryError> {
        tracing::debug!(user_id = id, "updating user");

        let user = self.repository.update(id, &input.name, input.dob).await?;
        Ok(user.to_response())
    }

    pub async fn delete_user(&self, id: i32) -> Result<(), RepositoryError> {
        tracing::debug!(user_id = id, "deleting user");

        self.repository.delete(id).await
    }
}
