//! PostgreSQL repository implementations

mod access;
mod client;
mod user;

pub use access::PgAccessRepository;
pub use client::PgClientRepository;
pub use user::PgUserRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub users: PgUserRepository,
    pub access: PgAccessRepository,
    pub clients: PgClientRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            access: PgAccessRepository::new(pool.clone()),
            clients: PgClientRepository::new(pool),
        }
    }
}
