//! BVS Auth Core - Authentication and access-control logic
//!
//! Password hashing, bearer token issuance/verification, session resolution,
//! and the authorization decisions that gate user management.

pub mod access;
pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod session;
pub mod token;
pub mod users;
pub mod validation;

pub use access::{Identity, ListScope};
pub use config::AuthConfig;
pub use error::AuthError;
pub use password::PasswordHasher;
pub use service::*;
pub use session::{RejectReason, SessionResolver, SessionState};
pub use token::{AccessClaims, IssuedToken, TokenCodec};
pub use users::*;
