/// Authentication module
///
/// Password hashing and stateless session tokens. There is no server-side
/// session state: logging out means the client discards its token.

mod claims;
mod jwt;
mod password;

pub use claims::Claims;
pub use jwt::AuthTokenService;
pub use password::PasswordHasher;
