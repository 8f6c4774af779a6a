pub mod auth;

pub use auth::{parse_bearer, require_auth};
