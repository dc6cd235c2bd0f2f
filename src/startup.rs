use actix_web::dev::Server;
use actix_web::{error, middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::net::TcpListener;

use crate::auth::{AuthTokenService, PasswordHasher};
use crate::configuration::{DatabaseSettings, Settings};
use crate::error::{AppError, ValidationError};
use crate::middleware::JwtMiddleware;
use crate::persistence::Store;
use crate::routes::{
    add_members, create_group, delete_group, group_details, health_check, login, signup,
};
use crate::services::{CredentialService, GroupService};

pub async fn get_connection_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.connection_string())
        .await
}

/// Wires the services together and starts serving on `listener`.
///
/// Configuration is validated here, before the first request is accepted.
pub fn run(listener: TcpListener, pool: PgPool, settings: &Settings) -> Result<Server, AppError> {
    let tokens = AuthTokenService::new(&settings.jwt)?;
    let hasher = PasswordHasher::new(&settings.hashing)?;
    let store = Store::new(pool);

    let credentials = web::Data::new(CredentialService::new(
        store.clone(),
        hasher,
        tokens.clone(),
    ));
    let groups = web::Data::new(GroupService::new(store));

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = format!("invalid JSON body: {}", err);
        error::Error::from(AppError::from(ValidationError::MalformedRequest(message)))
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let message = format!("invalid query string: {}", err);
        error::Error::from(AppError::from(ValidationError::MalformedRequest(message)))
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(credentials.clone())
            .app_data(groups.clone())
            .app_data(json_config.clone())
            .app_data(query_config.clone())
            // Public routes
            .route("/health_check", web::get().to(health_check))
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            // Protected routes
            .service(
                web::resource("/createGroup")
                    .wrap(JwtMiddleware::new(tokens.clone()))
                    .route(web::post().to(create_group)),
            )
            .service(
                web::resource("/addUserToGroup")
                    .wrap(JwtMiddleware::new(tokens.clone()))
                    .route(web::post().to(add_members)),
            )
            .service(
                web::resource("/groupDetails")
                    .wrap(JwtMiddleware::new(tokens.clone()))
                    .route(web::get().to(group_details)),
            )
            .service(
                web::resource("/group")
                    .wrap(JwtMiddleware::new(tokens.clone()))
                    .route(web::delete().to(delete_group)),
            )
    })
    .listen(listener)
    .map_err(|e| AppError::Internal(format!("Failed to bind listener: {}", e)))?
    .run();

    Ok(server)
}
