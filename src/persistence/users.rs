use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};

use crate::error::{is_unique_violation, AppError};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub async fn insert_user<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, AppError> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING user_id
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict("username or email already registered")
        } else {
            tracing::error!(error = %e, operation = "insert_user", "database error");
            e.into()
        }
    })
}

pub async fn find_by_username<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, email, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn find_id_by_username<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<Option<i64>, AppError> {
    let user_id = sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(executor)
        .await?;

    Ok(user_id)
}
