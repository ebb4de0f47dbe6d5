//! HTTP handlers

mod auth;
mod health;
mod users;

pub use auth::{login, me, register};
pub use health::{health, ready};
pub use users::{create_user, delete_user, get_user, list_users, update_user};
