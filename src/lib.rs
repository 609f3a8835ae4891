//! User API
//!
//! A CRUD service for a single `user` resource: axum handlers over a
//! service layer over a PostgreSQL repository.

pub mod api;
pub mod config;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod telemetry;

pub use api::{create_routes, AppError};
pub use repositories::{InMemoryUserRepository, PgUserRepository, RepositoryError, UserRepository};
pub use services::UserService;
