/// Session token issuance and validation
///
/// Tokens are HS256-signed JWTs carrying [`Claims`]. The signing key and TTL
/// come from [`JwtSettings`], validated once when the service is built.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};

#[derive(Clone)]
pub struct AuthTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
    issuer: String,
    subject: String,
    audience: String,
}

impl AuthTokenService {
    /// # Errors
    /// `ConfigError` if the secret is empty or the TTL is not positive.
    pub fn new(settings: &JwtSettings) -> Result<Self, AppError> {
        settings.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_audience(&[&settings.audience]);
        validation.sub = Some(settings.subject.clone());
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation,
            ttl_seconds: settings.access_token_expiry,
            issuer: settings.issuer.clone(),
            subject: settings.subject.clone(),
            audience: settings.audience.clone(),
        })
    }

    /// Sign a fresh session token for `user_id`.
    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let claims = Claims::new(
            user_id,
            chrono::Utc::now().timestamp(),
            self.ttl_seconds,
            self.issuer.clone(),
            self.subject.clone(),
            self.audience.clone(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Verify a presented token against the current time.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify signature and registered claims, then check `exp` against `now`
    /// ourselves regardless of what the library concluded.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => {
                    tracing::debug!(error = %e, "JWT validation error");
                    AuthError::MalformedToken
                }
            })?;

        if claims.is_expired_at(now) {
            return Err(AuthError::ExpiredToken);
        }

        Ok(claims)
    }
}
