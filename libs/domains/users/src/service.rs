use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserResponse, UserSummary, normalize_email};
use crate::repository::UserRepository;

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Register a new account.
    ///
    /// The email is checked before the identification number, so a request
    /// colliding on both reports the email.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: CreateUser) -> UserResult<User> {
        input.validate()?;

        if self.repository.email_exists(&input.email).await? {
            return Err(UserError::DuplicateEmail(normalize_email(&input.email)));
        }
        if self
            .repository
            .identification_exists(input.identification_number)
            .await?
        {
            return Err(UserError::DuplicateIdentification(input.identification_number));
        }

        let password_hash = hash_password(&input.password)?;
        self.repository.create(User::new(input, password_hash)).await
    }

    /// Check an email/password pair and return the account.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> UserResult<User> {
        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Rejected login with wrong password");
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(UserError::Inactive);
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        self.repository
            .get_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_summaries(&self) -> UserResult<Vec<UserSummary>> {
        let users = self.repository.list().await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn find_by_identification_number(&self, number: i64) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.find_by_identification_number(number).await?;
        if users.is_empty() {
            return Err(UserError::IdentificationNotFound(number));
        }
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Partial profile update.
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        input.validate()?;

        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        if let Some(email) = input.email.as_deref().map(normalize_email) {
            if email != user.email && self.repository.email_exists(&email).await? {
                return Err(UserError::EmailInUse(email));
            }
        }
        if let Some(number) = input.identification_number {
            if number != user.identification_number
                && self.repository.identification_exists(number).await?
            {
                return Err(UserError::IdentificationInUse(number));
            }
        }

        user.apply_update(input);
        self.repository
            .update(user)
            .await?
            .map(UserResponse::from)
            .ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.set_active(id, false).await? {
            return Err(UserError::NotFound(id));
        }
        tracing::info!(user_id = %id, "User deactivated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }
}

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;

    fn registration() -> CreateUser {
        CreateUser {
            name: "Andres".into(),
            last_name: "Moreno".into(),
            email: "andres@example.com".into(),
            telephone: "3109876543".into(),
            identification_type: "CC".into(),
            identification_number: 80123456,
            address: "Carrera 7 # 12-30".into(),
            state: "Cundinamarca".into(),
            city: "Bogota".into(),
            password: "correct horse battery".into(),
        }
    }

    fn stored_user(password: &str) -> User {
        User::new(registration(), hash_password(password).unwrap())
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong horse battery", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_| Ok(false));
        mock.expect_identification_exists().returning(|_| Ok(false));
        mock.expect_create()
            .withf(|user| user.password_hash.starts_with("$argon2"))
            .returning(|user| Ok(user));

        let user = UserService::new(mock).register(registration()).await.unwrap();
        assert_ne!(user.password_hash, "correct horse battery");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_checked_first() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_| Ok(true));
        mock.expect_identification_exists().never();
        mock.expect_create().never();

        let err = UserService::new(mock).register(registration()).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(email) if email == "andres@example.com"));
    }

    #[tokio::test]
    async fn test_register_duplicate_identification() {
        let mut mock = MockUserRepository::new();
        mock.expect_email_exists().returning(|_| Ok(false));
        mock.expect_identification_exists().returning(|_| Ok(true));
        mock.expect_create().never();

        let err = UserService::new(mock).register(registration()).await.unwrap_err();
        assert!(matches!(err, UserError::DuplicateIdentification(80123456)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password() {
        let user = stored_user("correct horse battery");
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(mock);
        let err = service
            .authenticate("andres@example.com", "guess")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));

        let ok = service
            .authenticate("andres@example.com", "correct horse battery")
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_inactive_account() {
        let mut user = stored_user("correct horse battery");
        user.is_active = false;
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let err = UserService::new(mock)
            .authenticate("andres@example.com", "correct horse battery")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Inactive));
    }

    #[tokio::test]
    async fn test_unknown_email_is_invalid_credentials() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_email().returning(|_| Ok(None));

        let err = UserService::new(mock)
            .authenticate("nobody@example.com", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_rejected() {
        let user = stored_user("pw");
        let id = user.id;
        let mut mock = MockUserRepository::new();
        mock.expect_get_by_id().returning(move |_| Ok(Some(user.clone())));
        mock.expect_email_exists().returning(|_| Ok(true));
        mock.expect_update().never();

        let err = UserService::new(mock)
            .update_user(
                id,
                UpdateUser {
                    email: Some("taken@example.com".into()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::EmailInUse(_)));
    }

    #[tokio::test]
    async fn test_find_by_identification_number_empty_is_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_find_by_identification_number()
            .returning(|_| Ok(vec![]));

        let err = UserService::new(mock)
            .find_by_identification_number(42)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::IdentificationNotFound(42)));
    }

    #[tokio::test]
    async fn test_deactivate_missing_user_is_not_found() {
        let mut mock = MockUserRepository::new();
        mock.expect_set_active().returning(|_, _| Ok(false));

        let err = UserService::new(mock).deactivate(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }
}
