use axum::http::{HeaderName, HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv, env_required};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::AUTH_TOKEN_HEADER;

/// Allowed browser origins, from the comma-separated `CORS_ALLOWED_ORIGIN`.
///
/// ```text
/// CORS_ALLOWED_ORIGIN=http://localhost:3000,https://shop.example.com
/// ```
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<HeaderValue>,
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let allowed_origins = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(HeaderValue::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: e.to_string(),
            })?;

        if allowed_origins.is_empty() {
            return Err(ConfigError::ParseError {
                key: "CORS_ALLOWED_ORIGIN".to_string(),
                details: "at least one origin is required".to_string(),
            });
        }

        Ok(Self { allowed_origins })
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::parse(&env_required("CORS_ALLOWED_ORIGIN")?)
    }
}

/// CORS layer for the configured origins.
///
/// Exposes `x-auth-token` so browser clients can read the token issued on
/// registration.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let auth_token = HeaderName::from_static(AUTH_TOKEN_HEADER);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            auth_token.clone(),
        ])
        .expose_headers([auth_token])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
