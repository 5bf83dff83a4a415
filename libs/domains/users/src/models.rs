use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account as stored in the `users` collection.
///
/// Carries the Argon2 hash, so it is never returned directly; handlers
/// answer with [`UserResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", with = "database::mongodb::uuid_string")]
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    /// Unique, stored lowercased
    pub email: String,
    pub telephone: String,
    pub identification_type: String,
    /// Unique
    pub identification_number: i64,
    pub address: String,
    pub state: String,
    pub city: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User without credentials
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub telephone: String,
    pub identification_type: String,
    pub identification_number: i64,
    pub address: String,
    pub state: String,
    pub city: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            telephone: user.telephone,
            identification_type: user.identification_type,
            identification_number: user.identification_number,
            address: user.address,
            state: user.state,
            city: user.city,
            is_active: user.is_active,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Entry of the admin user list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    /// `"<name> <lastName>"`
    pub name: String,
    pub id_number: i64,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: format!("{} {}", user.name, user.last_name),
            id_number: user.identification_number,
        }
    }
}

/// Registration payload for `POST /api/users`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub name: String,
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "must be a valid email"),
        length(min = 8, max = 255, message = "must be between 8 and 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "must be between 7 and 20 characters"))]
    pub telephone: String,
    #[validate(length(min = 1, max = 20, message = "must not be empty"))]
    pub identification_type: String,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub identification_number: i64,
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub state: String,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub city: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
}

/// Profile update. Absent fields keep their value; the password and admin
/// flag cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 50, message = "must be between 5 and 50 characters"))]
    pub last_name: Option<String>,
    #[validate(
        email(message = "must be a valid email"),
        length(min = 8, max = 255, message = "must be between 8 and 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(min = 7, max = 20, message = "must be between 7 and 20 characters"))]
    pub telephone: Option<String>,
    #[validate(length(min = 1, max = 20, message = "must not be empty"))]
    pub identification_type: Option<String>,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub identification_number: Option<i64>,
    #[validate(length(min = 1, max = 255, message = "must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub city: Option<String>,
}

/// Body of `POST /auth`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 1, max = 128, message = "must not be empty"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Answer to a successful registration; the token is also sent in
/// `x-auth-token`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl User {
    /// Build a new active, non-admin account around an already hashed password.
    pub fn new(input: CreateUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            last_name: input.last_name,
            email: normalize_email(&input.email),
            telephone: input.telephone,
            identification_type: input.identification_type,
            identification_number: input.identification_number,
            address: input.address,
            state: input.state,
            city: input.city,
            password_hash,
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = normalize_email(&email);
        }
        if let Some(telephone) = update.telephone {
            self.telephone = telephone;
        }
        if let Some(identification_type) = update.identification_type {
            self.identification_type = identification_type;
        }
        if let Some(number) = update.identification_number {
            self.identification_number = number;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        self.updated_at = Utc::now();
    }

    /// Roles encoded into issued tokens.
    pub fn roles(&self) -> Vec<String> {
        if self.is_admin {
            vec![axum_helpers::ROLE_ADMIN.to_string()]
        } else {
            Vec::new()
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
