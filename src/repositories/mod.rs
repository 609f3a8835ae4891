// Persistence gateways

pub mod memory;
pub mod user_repository;

pub use memory::InMemoryUserRepository;
pub use user_repository::{PgUserRepository, RepositoryError, UserRepository};
