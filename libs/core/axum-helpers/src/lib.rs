//! # Axum Helpers
//!
//! Shared HTTP plumbing for the shop services.
//!
//! - **[`errors`]**: the JSON error envelope and [`AppError`]
//! - **[`extractors`]**: UUID path and validated JSON extractors
//! - **[`auth`]**: stateless JWT issuing plus [`AuthUser`] / [`AdminUser`] extractors
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{AUTH_TOKEN_HEADER, AdminUser, AuthUser, JwtAuth, JwtClaims, JwtConfig, ROLE_ADMIN};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use http::{CorsConfig, create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};
