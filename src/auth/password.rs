/// Password Hashing and Verification
///
/// Salted bcrypt digests with a configurable work factor. Hashing is slow on
/// purpose; callers in async code run it on the blocking pool.

use bcrypt::{hash, verify};

use crate::configuration::HashingSettings;
use crate::error::{AppError, ConfigError};

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

#[derive(Clone, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// # Errors
    /// `ConfigError` if the cost is outside bcrypt's supported range.
    pub fn new(settings: &HashingSettings) -> Result<Self, AppError> {
        if !(MIN_COST..=MAX_COST).contains(&settings.cost) {
            return Err(ConfigError::InvalidValue(format!(
                "hashing.cost must be between {} and {}, got {}",
                MIN_COST,
                MAX_COST,
                settings.cost
            ))
            .into());
        }
        Ok(Self { cost: settings.cost })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// `Ok(false)` on mismatch. Only an unparseable digest is an error.
    pub fn verify(&self, digest: &str, password: &str) -> Result<bool, AppError> {
        verify(password, digest)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }
}
