//! Stateless JWT authentication.
//!
//! Handlers take [`AuthUser`] or [`AdminUser`] as an argument; the router
//! state must provide a [`JwtAuth`] via `FromRef`.
//!
//! ```ignore
//! async fn me(AuthUser(claims): AuthUser) -> String {
//!     claims.email
//! }
//! ```

pub mod config;
pub mod extractors;
pub mod jwt;

pub use config::{DEFAULT_TOKEN_TTL_SECS, JwtConfig};
pub use extractors::{AUTH_TOKEN_HEADER, AdminUser, AuthUser};
pub use jwt::{JwtAuth, JwtClaims, ROLE_ADMIN};
