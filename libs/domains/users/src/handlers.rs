//! HTTP handlers for `/api/users`

use axum::{
    Json, Router,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    AUTH_TOKEN_HEADER, AdminUser, AppError, AuthUser, JwtAuth, JwtClaims, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, DuplicateFieldResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::auth_handlers::issue_token;
use crate::models::{
    CreateUser, MessageResponse, RegisterResponse, UpdateUser, UserResponse, UserSummary,
};
use crate::repository::UserRepository;
use crate::service::UserService;

#[derive(OpenApi)]
#[openapi(
    paths(
        me,
        all_users,
        users_by_identification_number,
        user_by_id,
        register,
        update_me,
        deactivate_me,
        deactivate_user,
        update_user,
        delete_user,
    ),
    components(
        schemas(
            UserResponse, UserSummary, CreateUser, UpdateUser, RegisterResponse,
            MessageResponse
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            DuplicateFieldResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Users", description = "Account management")
    )
)]
pub struct ApiDoc;

/// Shared by the users and auth routers.
pub struct UsersState<R: UserRepository> {
    pub service: UserService<R>,
    pub auth: JwtAuth,
}

impl<R: UserRepository> Clone for UsersState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            auth: self.auth.clone(),
        }
    }
}

impl<R: UserRepository> FromRef<UsersState<R>> for JwtAuth {
    fn from_ref(state: &UsersState<R>) -> Self {
        state.auth.clone()
    }
}

pub fn router<R: UserRepository + 'static>(service: UserService<R>, auth: JwtAuth) -> Router {
    Router::new()
        .route("/", axum::routing::post(register::<R>).put(update_me::<R>))
        .route("/me", get(me::<R>))
        .route("/allUsers", get(all_users::<R>))
        .route("/userById/{idNumber}", get(users_by_identification_number::<R>))
        .route("/userByIdBson/{id}", get(user_by_id::<R>))
        .route("/deactivate", put(deactivate_me::<R>))
        .route("/deactivate/{id}", put(deactivate_user::<R>))
        .route("/{id}", put(update_user::<R>).delete(delete_user::<R>))
        .with_state(UsersState { service, auth })
}

/// Account id carried in the token subject.
fn caller_id(claims: &JwtClaims) -> Result<Uuid, AppError> {
    Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized("Invalid token".into()))
}

/// The caller's own account
#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn me<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.service.get_user(caller_id(&claims)?).await?;
    Ok(Json(user))
}

/// Every account as `{ id, name, idNumber }` (admin)
#[utoipa::path(
    get,
    path = "/allUsers",
    tag = "Users",
    responses(
        (status = 200, description = "User summaries", body = Vec<UserSummary>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn all_users<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    Ok(Json(state.service.list_summaries().await?))
}

/// Accounts with the given identification number (admin)
#[utoipa::path(
    get,
    path = "/userById/{idNumber}",
    tag = "Users",
    params(("idNumber" = i64, Path, description = "Identification number")),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserResponse>),
        (status = 400, description = "Identification number is not an integer"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn users_by_identification_number<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
    Path(raw): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let number: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid identification number '{raw}'")))?;

    Ok(Json(state.service.find_by_identification_number(number).await?))
}

/// Account by id (admin)
#[utoipa::path(
    get,
    path = "/userByIdBson/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn user_by_id<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(state.service.get_user(id).await?))
}

/// Register an account; the token is returned in the body and `x-auth-token`
#[utoipa::path(
    post,
    path = "",
    tag = "Users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "Registered", body = RegisterResponse,
            headers(("x-auth-token" = String, description = "Session token"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 406, response = DuplicateFieldResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): State<UsersState<R>>,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.service.register(input).await?;
    let token = issue_token(&state.auth, &user)?;

    tracing::info!(user_id = %user.id, "User registered");
    Ok((
        [(AUTH_TOKEN_HEADER, token.clone())],
        Json(RegisterResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }),
    ))
}

/// Update the caller's own profile
#[utoipa::path(
    put,
    path = "",
    tag = "Users",
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_me<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<Json<MessageResponse>, AppError> {
    state.service.update_user(caller_id(&claims)?, input).await?;
    Ok(Json(MessageResponse {
        message: "Updated successfully".into(),
    }))
}

/// Deactivate the caller's own account
#[utoipa::path(
    put,
    path = "/deactivate",
    tag = "Users",
    responses(
        (status = 204, description = "Deactivated"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn deactivate_me<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AuthUser(claims): AuthUser,
) -> Result<StatusCode, AppError> {
    state.service.deactivate(caller_id(&claims)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deactivate any account (admin)
#[utoipa::path(
    put,
    path = "/deactivate/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deactivated"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn deactivate_user<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    state.service.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update any account (admin)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn update_user<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> Result<StatusCode, AppError> {
    state.service.update_user(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete an account (admin)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    ),
    security(("bearer_auth" = []))
)]
async fn delete_user<R: UserRepository>(
    State(state): State<UsersState<R>>,
    AdminUser(_admin): AdminUser,
    UuidPath(id): UuidPath,
) -> Result<StatusCode, AppError> {
    state.service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
