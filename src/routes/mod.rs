use actix_web::HttpResponse;

mod auth;
mod groups;

pub use auth::{login, signup};
pub use groups::{add_members, create_group, delete_group, group_details};

/// GET /health_check
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "up" }))
}
