//! MongoDB repository tests (ignored without Docker)

use domain_users::*;
use test_utils::{TestDataBuilder, TestMongo, assertions::*};

async fn repository(mongo: &TestMongo) -> MongoUserRepository {
    let repo = MongoUserRepository::new(&mongo.database());
    repo.init_indexes().await.unwrap();
    repo
}

fn user(builder: &TestDataBuilder, local: &str, offset: u64) -> User {
    User::new(
        CreateUser {
            name: "Santiago".into(),
            last_name: "Ramirez".into(),
            email: builder.email(local),
            identification_number: builder.identification_number(offset),
            password: "unused".into(),
            ..CreateUser::default()
        },
        "hash".into(),
    )
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_indexes_map_to_domain_errors() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let builder = TestDataBuilder::from_test_name("mongo_unique");

    repo.create(user(&builder, "a", 0)).await.unwrap();

    let email = repo.create(user(&builder, "a", 1)).await;
    assert!(matches!(email, Err(UserError::DuplicateEmail(_))));

    let number = repo.create(user(&builder, "b", 0)).await;
    assert!(matches!(number, Err(UserError::DuplicateIdentification(_))));

    let mut other = repo.create(user(&builder, "c", 2)).await.unwrap();
    other.email = builder.email("a");
    assert!(matches!(repo.update(other).await, Err(UserError::EmailInUse(_))));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_lookup_deactivate_and_delete() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let builder = TestDataBuilder::from_test_name("mongo_lifecycle");

    let created = repo.create(user(&builder, "life", 0)).await.unwrap();

    let by_email = repo.get_by_email(&builder.email("LIFE")).await.unwrap();
    assert_uuid_eq(assert_some(by_email, "user by email").id, created.id, "user id");

    let by_number = repo
        .find_by_identification_number(builder.identification_number(0))
        .await
        .unwrap();
    assert_eq!(by_number.len(), 1);

    assert!(repo.set_active(created.id, false).await.unwrap());
    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "user");
    assert!(!fetched.is_active);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get_by_id(created.id).await.unwrap().is_none());
}
