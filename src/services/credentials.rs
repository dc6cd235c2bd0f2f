/// Signup and login
use crate::auth::{AuthTokenService, PasswordHasher};
use crate::error::{AppError, AuthError};
use crate::persistence::{users, Store};
use crate::validators::{is_valid_email, is_valid_password, is_valid_username};

#[derive(Clone)]
pub struct CredentialService {
    store: Store,
    hasher: PasswordHasher,
    tokens: AuthTokenService,
}

impl CredentialService {
    pub fn new(store: Store, hasher: PasswordHasher, tokens: AuthTokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a user and return the new user id.
    ///
    /// # Errors
    /// - `ValidationError` for empty or malformed fields
    /// - `Conflict` if the username or email is taken
    #[tracing::instrument(name = "Signing up user", skip(self, email, password))]
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> Result<i64, AppError> {
        let username = is_valid_username(username)?;
        let email = is_valid_email(email)?;
        is_valid_password(password)?;

        let password_hash = self.hash_blocking(password.to_string()).await?;
        let user_id = users::insert_user(self.store.pool(), &username, &email, &password_hash).await?;

        tracing::info!(user_id, "User signed up");
        Ok(user_id)
    }

    /// Check a username/password pair and issue a session token.
    ///
    /// Unknown usernames and wrong passwords are separate errors here so they
    /// can be logged apart; the HTTP layer renders both identically.
    #[tracing::instrument(name = "Logging in user", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let username = is_valid_username(username)?;
        is_valid_password(password)?;

        let user = users::find_by_username(self.store.pool(), &username)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(username.clone()))?;

        let matches = self
            .verify_blocking(user.password_hash, password.to_string())
            .await?;
        if !matches {
            return Err(AuthError::InvalidPassword(username).into());
        }

        let token = self.tokens.issue(user.user_id)?;
        tracing::info!(user_id = user.user_id, "User logged in");
        Ok(token)
    }

    async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_blocking(&self, digest: String, password: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&digest, &password))
            .await
            .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))?
    }
}
