/// Group Routes
///
/// All handlers here sit behind `JwtMiddleware`, which has already validated
/// the session token and stored its claims in the request.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::auth::Claims;
use crate::error::{AppError, ValidationError};
use crate::services::GroupService;

#[derive(Deserialize)]
pub struct GroupParams {
    pub groupname: String,
    pub members: Vec<String>,
}

#[derive(Deserialize)]
pub struct GroupQuery {
    pub groupname: Option<String>,
}

impl GroupQuery {
    fn group_name(&self) -> Result<&str, AppError> {
        match self.groupname.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ValidationError::EmptyField("groupname".to_string()).into()),
        }
    }
}

/// POST /createGroup
pub async fn create_group(
    claims: web::ReqData<Claims>,
    params: web::Json<GroupParams>,
    groups: web::Data<GroupService>,
) -> Result<HttpResponse, AppError> {
    let group_id = groups
        .create_group(&params.groupname, claims.user_id, &params.members)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "group_id": group_id })))
}

/// POST /addUserToGroup
pub async fn add_members(
    claims: web::ReqData<Claims>,
    params: web::Json<GroupParams>,
    groups: web::Data<GroupService>,
) -> Result<HttpResponse, AppError> {
    groups
        .add_members(&params.groupname, claims.user_id, &params.members)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "Status": "OK" })))
}

/// GET /groupDetails?groupname=
pub async fn group_details(
    claims: web::ReqData<Claims>,
    query: web::Query<GroupQuery>,
    groups: web::Data<GroupService>,
) -> Result<HttpResponse, AppError> {
    let details = groups
        .get_group_details(query.group_name()?, claims.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(details))
}

/// DELETE /group?groupname=
pub async fn delete_group(
    claims: web::ReqData<Claims>,
    query: web::Query<GroupQuery>,
    groups: web::Data<GroupService>,
) -> Result<HttpResponse, AppError> {
    let name = query.group_name()?;
    groups.delete_group(name, claims.user_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "Success": format!("Deleted group: {}", name)
    })))
}
