//! Common test utilities for bvs-auth-core integration tests

pub mod mock_repos;

#[allow(unused_imports)]
pub use mock_repos::MockStore;

use bvs_auth_core::config::MIN_BCRYPT_COST;
use bvs_auth_core::{AuthConfig, AuthService, PasswordHasher, UserService};
use std::sync::Arc;

#[allow(dead_code)]
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Config with the cheapest bcrypt cost
#[allow(dead_code)]
pub fn test_config() -> AuthConfig {
    AuthConfig::try_new(TEST_SECRET)
        .expect("test secret is non-empty")
        .with_bcrypt_cost(MIN_BCRYPT_COST)
}

/// Auth and user services over one shared in-memory store
#[allow(dead_code)]
pub fn services(
    store: &MockStore,
) -> (
    AuthService<MockStore, MockStore>,
    UserService<MockStore, MockStore>,
) {
    let config = test_config();
    let hasher = PasswordHasher::new(config.bcrypt_cost).expect("valid cost");
    let repo = Arc::new(store.clone());
    let auth = AuthService::with_hasher(&config, hasher.clone(), Arc::clone(&repo), Arc::clone(&repo))
        .expect("valid config");
    let users = UserService::new(hasher, Arc::clone(&repo), repo);
    (auth, users)
}
