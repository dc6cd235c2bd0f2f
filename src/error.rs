/// Application error taxonomy
///
/// Every failure in the service is one of a fixed set of domain errors,
/// unified under [`AppError`]. The HTTP boundary maps each of them onto
/// exactly one [`ErrorKind`], which decides the status code and the stable
/// message returned to the caller. Internal detail (driver messages, which
/// credential check failed) is logged, never rendered.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

// ============================================================================
// DOMAIN-SPECIFIC ERROR TYPES
// ============================================================================

/// Malformed or missing input
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is empty")]
    EmptyField(String),
    #[error("{0} is too long (maximum {1} characters)")]
    TooLong(String, usize),
    #[error("{0} has invalid format")]
    InvalidFormat(String),
    #[error("{0} contains control characters")]
    SuspiciousContent(String),
    #[error("{0}")]
    MalformedRequest(String),
}

/// Session and credential failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("no authorization token provided")]
    MissingToken,
    #[error("malformed or tampered token")]
    MalformedToken,
    #[error("token expired, please login again")]
    ExpiredToken,
    #[error("no user named '{0}'")]
    UserNotFound(String),
    #[error("password mismatch for '{0}'")]
    InvalidPassword(String),
}

/// Store-level failures
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("duplicate entry: {0}")]
    UniqueViolation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("transaction commit failed: {0}")]
    CommitFailed(String),
    #[error("query error: {0}")]
    Unexpected(String),
}

/// Process configuration that cannot be used
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required config: {0}")]
    MissingRequired(String),
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

// ============================================================================
// UNIFIED APPLICATION ERROR TYPE
// ============================================================================

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("internal error: {0}")]
    Internal(String),
}

/// The closed set of externally visible failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Authentication error",
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "Internal failure",
        }
    }
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::Database(DatabaseError::NotFound(what.into()))
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::Database(DatabaseError::UniqueViolation(what.into()))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::BadRequest,
            AppError::Auth(_) => ErrorKind::Unauthorized,
            AppError::Database(e) => match e {
                DatabaseError::UniqueViolation(_) => ErrorKind::Conflict,
                DatabaseError::NotFound(_) => ErrorKind::NotFound,
                DatabaseError::CommitFailed(_) | DatabaseError::Unexpected(_) => {
                    ErrorKind::Internal
                }
            },
            AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Detail string that is safe to hand to the caller.
    ///
    /// Both credential failures collapse into one phrase so a caller cannot
    /// tell which usernames exist.
    pub fn public_details(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Auth(e) => match e {
                AuthError::MissingToken => "no authorization token provided".to_string(),
                AuthError::MalformedToken => "invalid token".to_string(),
                AuthError::ExpiredToken => "token expired, please login again".to_string(),
                AuthError::UserNotFound(_) | AuthError::InvalidPassword(_) => {
                    "invalid credentials".to_string()
                }
            },
            AppError::Database(e) => match e {
                DatabaseError::UniqueViolation(what) => what.clone(),
                DatabaseError::NotFound(what) => what.clone(),
                DatabaseError::CommitFailed(_) | DatabaseError::Unexpected(_) => {
                    "internal failure".to_string()
                }
            },
            AppError::Config(_) | AppError::Internal(_) => "internal failure".to_string(),
        }
    }

    fn log_error(&self, request_id: &str) {
        match self {
            AppError::Validation(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Validation error");
            }
            AppError::Auth(e @ (AuthError::UserNotFound(_) | AuthError::InvalidPassword(_))) => {
                tracing::warn!(request_id = request_id, error = %e, "Invalid credentials attempt");
            }
            AppError::Auth(e) => {
                tracing::warn!(request_id = request_id, error = %e, "Authentication error");
            }
            AppError::Database(e @ (DatabaseError::UniqueViolation(_) | DatabaseError::NotFound(_))) => {
                tracing::info!(request_id = request_id, error = %e, "Request rejected by store");
            }
            AppError::Database(e) => {
                tracing::error!(request_id = request_id, error = %e, "Database error");
            }
            AppError::Config(e) => {
                tracing::error!(request_id = request_id, error = %e, "Configuration error");
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = request_id, error = %msg, "Internal error");
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::not_found("record not found"),
            e if is_unique_violation(e) => AppError::conflict("duplicate entry"),
            _ => AppError::Database(DatabaseError::Unexpected(err.to_string())),
        }
    }
}

/// SQLSTATE 23505
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

// ============================================================================
// HTTP RESPONSE MAPPING
// ============================================================================

/// `{"error": {"code": .., "message": .., "details": ..}}`
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetails {
    pub code: u16,
    pub message: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn from_error(err: &AppError) -> Self {
        let kind = err.kind();
        Self {
            error: ErrorDetails {
                code: kind.status_code().as_u16(),
                message: kind.message().to_string(),
                details: err.public_details(),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let request_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&request_id);

        HttpResponse::build(self.status_code()).json(ErrorResponse::from_error(self))
    }
}
