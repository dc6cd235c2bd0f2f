/// Authentication Routes
///
/// Account creation and login. Both are public; every other route requires
/// the token returned by `/login`.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::CredentialService;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: i64,
}

#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// POST /signup
///
/// # Errors
/// - 400: empty or malformed field
/// - 409: username or email already registered
/// - 500: internal failure
pub async fn signup(
    form: web::Json<SignupRequest>,
    credentials: web::Data<CredentialService>,
) -> Result<HttpResponse, AppError> {
    let user_id = credentials
        .signup(&form.username, &form.email, &form.password)
        .await?;

    Ok(HttpResponse::Created().json(SignupResponse { user_id }))
}

/// POST /login
///
/// # Errors
/// - 400: empty field
/// - 401: unknown username or wrong password (indistinguishable)
/// - 500: internal failure
pub async fn login(
    form: web::Json<LoginRequest>,
    credentials: web::Data<CredentialService>,
) -> Result<HttpResponse, AppError> {
    let access_token = credentials.login(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse { access_token }))
}
