use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::User;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("User not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Statement timed out after {0:?}")]
    Timeout(Duration),
    #[error("User id sequence exhausted")]
    SequenceExhausted,
}

/// Storage operations for the `users` table.
///
/// Each call is a single atomic statement. `NotFound` is reserved for
/// zero-row outcomes; every other failure is a storage error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, name: &str, dob: NaiveDate) -> Result<User, RepositoryError>;
    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError>;
    /// Most recently created first.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;
    async fn update(&self, id: i32, name: &str, dob: NaiveDate) -> Result<User, RepositoryError>;
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}

pub struct PgUserRepository {
    pool: PgPool,
    statement_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, statement_timeout: Duration) -> Self {
        Self {
            pool,
            statement_timeout,
        }
    }

    /// Runs one statement under the configured deadline. An elapsed deadline
    /// drops the query future, which cancels it on the connection.
    async fn bounded<T, F>(&self, statement: F) -> Result<T, RepositoryError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, statement).await {
            Ok(result) => result.map_err(RepositoryError::from),
            Err(_) => Err(RepositoryError::Timeout(self.statement_timeout)),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, name: &str, dob: NaiveDate) -> Result<User, RepositoryError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (name, dob)
                VALUES ($1, $2)
                RETURNING id, name, dob, created_at, updated_at
                "#,
            )
            .bind(name)
            .bind(dob)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepositoryError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                "SELECT id, name, dob, created_at, updated_at FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                "SELECT id, name, dob, created_at, updated_at FROM users ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn update(&self, id: i32, name: &str, dob: NaiveDate) -> Result<User, RepositoryError> {
        self.bounded(
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET name = $2, dob = $3, updated_at = CURRENT_TIMESTAMP
                WHERE id = $1
                RETURNING id, name, dob, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(dob)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = self
            .bounded(
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
