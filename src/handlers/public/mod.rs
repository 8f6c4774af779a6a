// Public handlers: no token required.

pub mod categories;
pub mod health;
pub mod login;
pub mod threads;
pub mod users;
