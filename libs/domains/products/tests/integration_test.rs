//! MongoDB repository tests
//!
//! Run against a throwaway container; ignored unless Docker is available
//! (`cargo test -- --ignored`).

use domain_products::*;
use test_utils::{TestMongo, assertions::*};

async fn repository(mongo: &TestMongo) -> MongoProductRepository {
    let repo = MongoProductRepository::new(&mongo.database());
    repo.init_indexes().await.unwrap();
    repo
}

fn input(name: &str, line: &str, price: f64) -> CreateProduct {
    CreateProduct {
        name: name.into(),
        business_line: line.into(),
        price,
        model: Some(format!("{name}-M1")),
        ..CreateProduct::default()
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_create_get_and_partial_update() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;

    let created = repo.create(input("Xylene", "Solvents", 4.0)).await.unwrap();
    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "created product");
    assert_uuid_eq(fetched.id, created.id, "fetched product id");

    let updated = repo
        .update(
            created.id,
            UpdateProduct {
                price: Some(6.0),
                ..UpdateProduct::default()
            },
        )
        .await
        .unwrap();
    let updated = assert_some(updated, "updated product");
    assert_eq!(updated.price, 6.0);
    assert_eq!(updated.model, created.model);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_paging_matches_in_memory_semantics() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    for i in 0..12 {
        repo.create(input(&format!("Solvent {i}"), "Solvents", 10.0))
            .await
            .unwrap();
    }
    repo.create(input("Vinegar", "Acids", 1.0)).await.unwrap();

    let first = CatalogQuery::listing(Some("solv"), None, None).unwrap();
    let second = CatalogQuery::listing(Some("solv"), None, Some("1")).unwrap();

    assert_eq!(repo.find_page(&first).await.unwrap().len(), 11);
    assert_eq!(repo.find_page(&second).await.unwrap().len(), 1);
    assert_eq!(repo.count(&first).await.unwrap(), 12);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_search_price_and_distinct() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    repo.create(input("Glass cleaner", "Cleaners", 10.0)).await.unwrap();
    repo.create(input("Toluene", "Solvents", 50.0)).await.unwrap();
    repo.create(input("Acetone", "Solvents", 51.0)).await.unwrap();

    let search = CatalogQuery::search("CLEAN", None).unwrap();
    assert_eq!(repo.count(&search).await.unwrap(), 1);

    let priced = CatalogQuery::listing(None, Some("10-50"), None).unwrap();
    assert_eq!(repo.count(&priced).await.unwrap(), 2);

    let lines = repo.distinct_business_lines().await.unwrap();
    assert_eq!(lines, vec!["Cleaners".to_string(), "Solvents".to_string()]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_delete_returns_the_removed_document() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;
    let created = repo.create(input("Acetone", "Solvents", 7.0)).await.unwrap();

    let deleted = repo.delete(created.id).await.unwrap();
    assert_eq!(assert_some(deleted, "deleted product").name, "Acetone");
    assert!(repo.delete(created.id).await.unwrap().is_none());
}
