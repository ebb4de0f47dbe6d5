//! Password hashing and verification (bcrypt)

use std::sync::Arc;

use crate::AuthError;

/// bcrypt ignores everything past this many bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Placeholder verified against when the account does not exist
const DUMMY_PASSWORD: &str = "bvs-dummy-password-for-timing";

/// bcrypt-based credential store.
///
/// Hashes embed salt and cost, so verification needs nothing but the hash.
#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    ///
    /// Pre-computes a hash at the same cost for [`verify_dummy`](Self::verify_dummy).
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost).map_err(|e| {
            tracing::error!("Invalid bcrypt cost {}: {}", cost, e);
            AuthError::Configuration(format!("invalid bcrypt cost: {cost}"))
        })?;

        Ok(Self {
            cost,
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// Configured cost
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    ///
    /// Passwords longer than [`MAX_PASSWORD_BYTES`] are refused rather than
    /// silently truncated.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::Validation(format!(
                "Password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        bcrypt::hash(password, self.cost).map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AuthError::Internal("Failed to hash password".to_string())
        })
    }

    /// Verify a password against a stored hash.
    ///
    /// Malformed hashes verify as `false`. Over-long passwords are `false`
    /// too, after the same amount of work.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        if password.len() > MAX_PASSWORD_BYTES {
            let _ = bcrypt::verify(password, hash);
            return false;
        }
        match bcrypt::verify(password, hash) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!("Password verification error: {}", e);
                false
            }
        }
    }

    /// Burn the same work as a real verification. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_async(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                tracing::error!("Hashing task failed: {}", e);
                AuthError::Internal("Failed to hash password".to_string())
            })?
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_async(&self, password: String, hash: String) -> bool {
        let hasher = self.clone();
        match tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!("Verification task failed: {}", e);
                false
            }
        }
    }

    /// [`verify_dummy`](Self::verify_dummy) on the blocking pool
    pub async fn verify_dummy_async(&self, password: String) -> bool {
        let hasher = self.clone();
        let _ = tokio::task::spawn_blocking(move || hasher.verify_dummy(&password)).await;
        false
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}
