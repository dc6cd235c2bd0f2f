use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgExecutor};

use crate::error::{is_unique_violation, AppError};

#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub group_id: i64,
    pub group_name: String,
    pub admin_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A group as seen by one of its members
#[derive(Debug, Clone, FromRow)]
pub struct MemberView {
    pub group_id: i64,
    pub group_name: String,
    pub admin_username: String,
    pub members: Vec<String>,
}

pub async fn insert_group(
    conn: &mut PgConnection,
    group_name: &str,
    admin_id: i64,
) -> Result<i64, AppError> {
    let group_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO groups (group_name, admin_id)
        VALUES ($1, $2)
        RETURNING group_id
        "#,
    )
    .bind(group_name)
    .bind(admin_id)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::conflict(format!("group '{}' already exists", group_name))
        } else {
            tracing::error!(error = %e, operation = "insert_group", "database error");
            e.into()
        }
    })?;

    tracing::debug!(group_id, group_name, admin_id, "Inserted group row");
    Ok(group_id)
}

/// Fails with a conflict if the pair already exists.
pub async fn insert_membership(
    conn: &mut PgConnection,
    group_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    sqlx::query("INSERT INTO groupmembers (group_id, user_id) VALUES ($1, $2)")
        .bind(group_id)
        .bind(user_id)
        .execute(conn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("user is already a member of the group")
            } else {
                tracing::error!(error = %e, operation = "insert_membership", "database error");
                e.into()
            }
        })?;

    tracing::debug!(group_id, user_id, "Inserted group member row");
    Ok(())
}

/// Locks the group row for the rest of the transaction. Returns `None` both
/// when the group does not exist and when `admin_id` does not administer it.
pub async fn find_administered_for_update(
    conn: &mut PgConnection,
    group_name: &str,
    admin_id: i64,
) -> Result<Option<Group>, AppError> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT group_id, group_name, admin_id, created_at
        FROM groups
        WHERE group_name = $1 AND admin_id = $2
        FOR UPDATE
        "#,
    )
    .bind(group_name)
    .bind(admin_id)
    .fetch_optional(conn)
    .await?;

    Ok(group)
}

/// Returns `None` unless `user_id` belongs to the group. Membership check,
/// admin and member list come from one statement, so they share a snapshot.
pub async fn find_for_member<'e>(
    executor: impl PgExecutor<'e>,
    group_name: &str,
    user_id: i64,
) -> Result<Option<MemberView>, AppError> {
    let view = sqlx::query_as::<_, MemberView>(
        r#"
        SELECT
            g.group_id,
            g.group_name,
            u.username AS admin_username,
            ARRAY(
                SELECT mu.username::TEXT
                FROM groupmembers m
                INNER JOIN users mu ON mu.user_id = m.user_id
                WHERE m.group_id = g.group_id
            ) AS members
        FROM groups g
        INNER JOIN groupmembers gm ON gm.group_id = g.group_id
        INNER JOIN users u ON u.user_id = g.admin_id
        WHERE g.group_name = $1 AND gm.user_id = $2
        "#,
    )
    .bind(group_name)
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(view)
}

pub async fn delete_memberships(conn: &mut PgConnection, group_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM groupmembers WHERE group_id = $1")
        .bind(group_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_group(conn: &mut PgConnection, group_id: i64) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM groups WHERE group_id = $1")
        .bind(group_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
