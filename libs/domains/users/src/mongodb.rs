//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use chrono::Utc;
use database::mongodb::duplicate_key_field;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_bson},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{User, normalize_email};
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<User>(collection_name),
        }
    }

    /// Unique indexes on `email` and `identificationNumber`.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let unique = |field: &str| {
            let mut keys = Document::new();
            keys.insert(field, 1);
            IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("idx_{field}_unique"))
                        .build(),
                )
                .build()
        };

        self.collection
            .create_indexes(vec![unique("email"), unique("identificationNumber")])
            .await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.to_string() }
    }
}

/// Translate a unique index violation into the matching domain error.
fn unique_violation(
    err: mongodb::error::Error,
    user: &User,
    on_email: fn(String) -> UserError,
    on_identification: fn(i64) -> UserError,
) -> UserError {
    match duplicate_key_field(&err).as_deref() {
        Some("email") => on_email(user.email.clone()),
        Some("identificationNumber") => on_identification(user.identification_number),
        _ => err.into(),
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await.map_err(|e| {
            unique_violation(
                e,
                &user,
                UserError::DuplicateEmail,
                UserError::DuplicateIdentification,
            )
        })?;

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "email": normalize_email(email) })
            .await?)
    }

    #[instrument(skip(self))]
    async fn find_by_identification_number(&self, number: i64) -> UserResult<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! { "identificationNumber": number })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> UserResult<Vec<User>> {
        let cursor = self.collection.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<Option<User>> {
        let result = self
            .collection
            .replace_one(Self::id_filter(user.id), &user)
            .await
            .map_err(|e| {
                unique_violation(e, &user, UserError::EmailInUse, UserError::IdentificationInUse)
            })?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        tracing::info!(user_id = %user.id, "Updated user");
        Ok(Some(user))
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: Uuid, active: bool) -> UserResult<bool> {
        let update = doc! {
            "$set": {
                "isActive": active,
                "updatedAt": to_bson(&Utc::now())?,
            }
        };
        let result = self
            .collection
            .update_one(Self::id_filter(id), update)
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": normalize_email(email) })
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self))]
    async fn identification_exists(&self, number: i64) -> UserResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "identificationNumber": number })
            .await?;
        Ok(count > 0)
    }
}
