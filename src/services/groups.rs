/// Group lifecycle and membership
///
/// Every mutation runs inside a single transaction. Any failure before
/// `Store::commit` drops the transaction and the store rolls back all of its
/// writes, so no partially built or partially deleted group is ever visible.
///
/// Lookups that combine "does the group exist" with "may this user act on it"
/// report a single `NotFound`, so callers cannot discover groups they have no
/// business with.

use serde::Serialize;
use sqlx::PgConnection;

use crate::error::{AppError, ErrorKind, ValidationError};
use crate::persistence::{groups, users, Store};
use crate::validators::{is_valid_group_name, is_valid_username};

const GROUP_NOT_FOUND: &str = "no group found with the given data";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDetails {
    #[serde(rename = "GroupName")]
    pub name: String,
    #[serde(rename = "Admin")]
    pub admin_username: String,
    #[serde(rename = "Members")]
    pub members: Vec<String>,
}

#[derive(Clone)]
pub struct GroupService {
    store: Store,
}

impl GroupService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a group administered by `requester_id`, with the requester and
    /// every listed member as members.
    ///
    /// # Errors
    /// - `NotFound` if any member username does not resolve
    /// - `Conflict` if the name is taken or a member is listed twice
    ///   (including the requester)
    #[tracing::instrument(name = "Creating group", skip(self, members), fields(member_count = members.len()))]
    pub async fn create_group(
        &self,
        name: &str,
        requester_id: i64,
        members: &[String],
    ) -> Result<i64, AppError> {
        let name = is_valid_group_name(name)?;
        let members = validate_members(members)?;

        let mut tx = self.store.begin().await?;
        let group_id = groups::insert_group(&mut *tx, &name, requester_id).await?;
        groups::insert_membership(&mut *tx, group_id, requester_id).await?;
        add_memberships(&mut *tx, group_id, &members).await?;
        self.store.commit(tx).await?;

        tracing::info!(group_id, "Group created");
        Ok(group_id)
    }

    /// Delete a group and all of its memberships. Only the admin may do this.
    #[tracing::instrument(name = "Deleting group", skip(self))]
    pub async fn delete_group(&self, name: &str, requester_id: i64) -> Result<(), AppError> {
        let name = is_valid_group_name(name)?;

        let mut tx = self.store.begin().await?;
        let group = groups::find_administered_for_update(&mut *tx, &name, requester_id)
            .await?
            .ok_or_else(|| AppError::not_found(GROUP_NOT_FOUND))?;

        let removed = groups::delete_memberships(&mut *tx, group.group_id).await?;
        if groups::delete_group(&mut *tx, group.group_id).await? != 1 {
            return Err(AppError::not_found(GROUP_NOT_FOUND));
        }
        self.store.commit(tx).await?;

        tracing::info!(group_id = group.group_id, memberships = removed, "Group deleted");
        Ok(())
    }

    /// Add members to a group. Only the admin may do this, and either every
    /// listed member is added or none is.
    #[tracing::instrument(name = "Adding group members", skip(self, members), fields(member_count = members.len()))]
    pub async fn add_members(
        &self,
        name: &str,
        requester_id: i64,
        members: &[String],
    ) -> Result<(), AppError> {
        let name = is_valid_group_name(name)?;
        if members.is_empty() {
            return Err(ValidationError::EmptyField("members".to_string()).into());
        }
        let members = validate_members(members)?;

        let mut tx = self.store.begin().await?;
        let group = groups::find_administered_for_update(&mut *tx, &name, requester_id)
            .await?
            .ok_or_else(|| AppError::not_found(GROUP_NOT_FOUND))?;

        add_memberships(&mut *tx, group.group_id, &members).await?;
        self.store.commit(tx).await?;

        tracing::info!(group_id = group.group_id, "Group members added");
        Ok(())
    }

    /// Name, admin and member list of a group the requester belongs to.
    #[tracing::instrument(name = "Fetching group details", skip(self))]
    pub async fn get_group_details(
        &self,
        name: &str,
        requester_id: i64,
    ) -> Result<GroupDetails, AppError> {
        let name = is_valid_group_name(name)?;

        let view = groups::find_for_member(self.store.pool(), &name, requester_id)
            .await?
            .ok_or_else(|| AppError::not_found(GROUP_NOT_FOUND))?;

        Ok(GroupDetails {
            name: view.group_name,
            admin_username: view.admin_username,
            members: view.members,
        })
    }
}

/// Trimmed member usernames, in order and without de-duplication. Any invalid
/// entry rejects the whole request before the store is touched.
fn validate_members(members: &[String]) -> Result<Vec<String>, AppError> {
    members
        .iter()
        .map(|member| is_valid_username(member).map_err(AppError::from))
        .collect()
}

/// Resolve and insert each member in order. The first unknown username or
/// duplicate pair aborts; the caller's transaction then rolls back.
async fn add_memberships(
    conn: &mut PgConnection,
    group_id: i64,
    members: &[String],
) -> Result<(), AppError> {
    for member in members {
        let user_id = users::find_id_by_username(&mut *conn, member)
            .await?
            .ok_or_else(|| {
                tracing::warn!(group_id, member = %member, "Unknown member username");
                AppError::not_found(format!("user '{}' not found", member))
            })?;

        groups::insert_membership(&mut *conn, group_id, user_id)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::Conflict => {
                    AppError::conflict(format!("'{}' is already a member of the group", member))
                }
                _ => e,
            })?;
    }
    Ok(())
}
