// Domain entities and wire shapes

pub mod error;
pub mod user;

pub use error::*;
pub use user::*;
