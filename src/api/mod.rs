// HTTP handlers and routing

pub mod error;
pub mod health;
pub mod routes;
pub mod users;

pub use error::{AppError, RequestFailure};
pub use routes::create_routes;
