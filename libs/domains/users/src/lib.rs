//! Users Domain
//!
//! Customer accounts: registration with Argon2-hashed passwords, token login,
//! profile updates, deactivation and admin management.
//!
//! ```text
//! handlers / auth_handlers ─▶ service ─▶ repository (trait) ─▶ MongoDB | in-memory
//! ```
//!
//! Two routers share [`handlers::UsersState`]: [`handlers::router`] serves
//! `/api/users` and [`auth_handlers::router`] serves `/auth`.

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use auth_handlers::AuthApiDoc;
pub use crate::mongodb::MongoUserRepository;
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateUser, LoginRequest, RegisterResponse, TokenResponse, UpdateUser, User, UserResponse,
    UserSummary,
};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
