use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

/// Header checked before `Authorization: Bearer`.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Claims of an authenticated caller.
///
/// The router state must expose a [`JwtAuth`] through `FromRef`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

/// Claims of an authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub JwtClaims);

async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    if let Some(token) = parts
        .headers
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return Some(token.to_string());
    }

    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(auth)| auth.token().to_string())
}

impl<S> FromRequestParts<S> for AuthUser
where
    JwtAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await
            .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided".into()))?;

        JwtAuth::from_ref(state)
            .verify_token(&token)
            .map(AuthUser)
            .map_err(|e| {
                tracing::debug!(error = %e, "JWT verification failed");
                AppError::Unauthorized("Invalid token".into())
            })
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    JwtAuth: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            return Err(AppError::Forbidden("Administrator role required".into()));
        }
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, ROLE_ADMIN};
    use axum::{Router, body::Body, extract::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("extractor-test-secret-0123456789abcdef", 600).unwrap())
    }

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(|AuthUser(c): AuthUser| async move { c.email }))
            .route("/admin", get(|AdminUser(c): AdminUser| async move { c.sub }))
            .with_state(auth)
    }

    async fn status(auth: &JwtAuth, uri: &str, header: Option<(&str, String)>) -> StatusCode {
        let mut req = Request::builder().uri(uri);
        if let Some((name, value)) = header {
            req = req.header(name, value);
        }
        app(auth.clone())
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        assert_eq!(status(&jwt(), "/me", None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_x_auth_token_and_bearer_are_accepted() {
        let auth = jwt();
        let token = auth.create_token("u1", "a@b.co", "A", &[]).unwrap();

        let via_custom = status(&auth, "/me", Some((AUTH_TOKEN_HEADER, token.clone()))).await;
        let via_bearer = status(&auth, "/me", Some(("authorization", format!("Bearer {token}")))).await;

        assert_eq!(via_custom, StatusCode::OK);
        assert_eq!(via_bearer, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_tampered_token_is_401() {
        let auth = jwt();
        let mut token = auth.create_token("u1", "a@b.co", "A", &[]).unwrap();
        token.push('x');
        assert_eq!(
            status(&auth, "/me", Some((AUTH_TOKEN_HEADER, token))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_admin_route_needs_admin_role() {
        let auth = jwt();
        let customer = auth.create_token("u1", "a@b.co", "A", &[]).unwrap();
        let admin = auth
            .create_token("u2", "root@b.co", "R", &[ROLE_ADMIN.to_string()])
            .unwrap();

        assert_eq!(
            status(&auth, "/admin", Some((AUTH_TOKEN_HEADER, customer))).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(&auth, "/admin", Some((AUTH_TOKEN_HEADER, admin))).await,
            StatusCode::OK
        );
    }
}
