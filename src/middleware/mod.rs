/// Middleware module
///
/// Session authentication for protected routes.

mod jwt_middleware;

pub use jwt_middleware::{JwtMiddleware, TOKEN_HEADER};
