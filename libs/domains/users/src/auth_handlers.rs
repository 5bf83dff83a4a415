//! `POST /auth`: exchange credentials for a token

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use axum_helpers::{
    AUTH_TOKEN_HEADER, AppError, JwtAuth, ValidatedJson,
    errors::responses::{BadRequestValidationResponse, UnauthorizedResponse},
};
use utoipa::OpenApi;

use crate::error::UserError;
use crate::handlers::UsersState;
use crate::models::{LoginRequest, TokenResponse, User};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(
        schemas(LoginRequest, TokenResponse),
        responses(BadRequestValidationResponse, UnauthorizedResponse)
    ),
    tags((name = "Auth", description = "Token issuing"))
)]
pub struct AuthApiDoc;

pub fn router<R: UserRepository + 'static>(service: UserService<R>, auth: JwtAuth) -> Router {
    Router::new()
        .route("/", post(login::<R>))
        .with_state(UsersState { service, auth })
}

/// Sign a token for `user`, carrying the admin role when `isAdmin` is set.
pub fn issue_token(auth: &JwtAuth, user: &User) -> Result<String, UserError> {
    auth.create_token(&user.id.to_string(), &user.email, &user.name, &user.roles())
        .map_err(|e| {
            tracing::error!(user_id = %user.id, error = ?e, "Failed to sign token");
            UserError::Token(e.to_string())
        })
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): State<UsersState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .service
        .authenticate(&input.email, &input.password)
        .await?;
    let token = issue_token(&state.auth, &user)?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(([(AUTH_TOKEN_HEADER, token.clone())], Json(TokenResponse { token })))
}
