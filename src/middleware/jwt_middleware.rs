/// Session Token Middleware
///
/// Validates the session token carried in the `token` header and injects the
/// resulting claims into request extensions for the route handlers. Requests
/// without a valid token are rejected before any handler or store access.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

use crate::auth::AuthTokenService;
use crate::error::{AppError, AuthError};

pub const TOKEN_HEADER: &str = "token";

pub struct JwtMiddleware {
    tokens: AuthTokenService,
}

impl JwtMiddleware {
    pub fn new(tokens: AuthTokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(JwtMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    tokens: AuthTokenService,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let validated = match req.headers().get(TOKEN_HEADER) {
            None => Err(AuthError::MissingToken),
            Some(value) => value
                .to_str()
                .map_err(|_| AuthError::MalformedToken)
                .and_then(|token| self.tokens.validate(token)),
        };

        match validated {
            Ok(claims) => {
                tracing::debug!(user_id = claims.user_id, "Session token validated");
                req.extensions_mut().insert(claims);

                let service = self.service.clone();
                Box::pin(async move { service.call(req).await })
            }
            Err(e) => {
                tracing::warn!(path = %req.path(), error = %e, "Rejected unauthenticated request");
                Box::pin(async move { Err(AppError::from(e).into()) })
            }
        }
    }
}
