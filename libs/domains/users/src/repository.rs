use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, normalize_email};

/// Repository trait for User persistence
///
/// Emails are compared case-insensitively. `create` reports taken unique
/// fields as [`UserError::DuplicateEmail`] / [`UserError::DuplicateIdentification`],
/// `update` as [`UserError::EmailInUse`] / [`UserError::IdentificationInUse`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_identification_number(&self, number: i64) -> UserResult<Vec<User>>;

    /// All users, oldest first
    async fn list(&self) -> UserResult<Vec<User>>;

    /// Replace the stored user. `None` when it does not exist.
    async fn update(&self, user: User) -> UserResult<Option<User>>;

    /// Returns false when the user does not exist.
    async fn set_active(&self, id: Uuid, active: bool) -> UserResult<bool>;

    async fn delete(&self, id: Uuid) -> UserResult<bool>;

    async fn email_exists(&self, email: &str) -> UserResult<bool>;

    async fn identification_exists(&self, number: i64) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict<'a>(mut users: impl Iterator<Item = &'a User>, user: &User) -> Option<Conflict> {
    users.find_map(|other| {
        if other.id == user.id {
            None
        } else if other.email == user.email {
            Some(Conflict::Email)
        } else if other.identification_number == user.identification_number {
            Some(Conflict::Identification)
        } else {
            None
        }
    })
}

enum Conflict {
    Email,
    Identification,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        match conflict(users.values(), &user) {
            Some(Conflict::Email) => return Err(UserError::DuplicateEmail(user.email)),
            Some(Conflict::Identification) => {
                return Err(UserError::DuplicateIdentification(user.identification_number));
            }
            None => {}
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, email = %user.email, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_identification_number(&self, number: i64) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.identification_number == number)
            .cloned()
            .collect())
    }

    async fn list(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut result: Vec<User> = users.values().cloned().collect();
        result.sort_by_key(|u| u.id);
        Ok(result)
    }

    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Ok(None);
        }

        match conflict(users.values(), &user) {
            Some(Conflict::Email) => return Err(UserError::EmailInUse(user.email)),
            Some(Conflict::Identification) => {
                return Err(UserError::IdentificationInUse(user.identification_number));
            }
            None => {}
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, "Updated user");
        Ok(Some(user))
    }

    async fn set_active(&self, id: Uuid, active: bool) -> UserResult<bool> {
        let mut users = self.users.write().await;
        Ok(users
            .get_mut(&id)
            .map(|user| {
                user.is_active = active;
                user.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let removed = self.users.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(removed)
    }

    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        Ok(self.get_by_email(email).await?.is_some())
    }

    async fn identification_exists(&self, number: i64) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.identification_number == number))
    }
}
