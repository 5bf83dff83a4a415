//! MongoDB repository tests
//!
//! Run against a throwaway container; ignored unless Docker is available
//! (`cargo test -- --ignored`).

use domain_orders::*;
use test_utils::{TestMongo, assertions::*};
use uuid::Uuid;

async fn repository(mongo: &TestMongo) -> MongoOrderRepository {
    let repo = MongoOrderRepository::new(&mongo.database());
    repo.init_indexes().await.unwrap();
    repo
}

fn input(email: &str) -> CreateOrder {
    CreateOrder {
        user: CustomerSnapshot {
            name: "Marina".into(),
            last_name: "Ospina".into(),
            email: email.into(),
            telephone: "3001234567".into(),
            identification_type: "CC".into(),
            identification_number: 1020304050,
            ..CustomerSnapshot::default()
        },
        products: vec![LineItem {
            product_id: Uuid::now_v7(),
            qty: 3,
            price: 4.0,
            ..LineItem::default()
        }],
        total_price: 12.0,
    }
}

fn account(email: &str) -> String {
    format!("account:{email}")
}

async fn place(repo: &MongoOrderRepository, email: &str) -> Order {
    let id = repo.next_id().await.unwrap();
    repo.create(Order::new(id, account(email), input(email)))
        .await
        .unwrap()
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_sequence_ids_increase_and_round_trip() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;

    let first = place(&repo, "buyer@example.com").await;
    let second = place(&repo, "buyer@example.com").await;
    assert!(second.id > first.id);

    let fetched = assert_some(repo.get_by_id(first.id).await.unwrap(), "first order");
    assert_eq!(fetched.user.email, "buyer@example.com");
    assert_eq!(fetched.status, OrderStatus::Pending);
    assert_eq!(fetched.products.len(), 1);
    assert_eq!(fetched.products[0].product_id, first.products[0].product_id);
    assert_eq!(fetched.customer_id, account("buyer@example.com"));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_filtered_listing_newest_first() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;

    for _ in 0..3 {
        place(&repo, "buyer@example.com").await;
    }
    let mut other = place(&repo, "other@example.com").await;
    other.status = OrderStatus::Paid;
    repo.update(other.clone()).await.unwrap();

    let filter = OrderFilter {
        email: Some("BUYER@example.com".into()),
        limit: 2,
        ..OrderFilter::default()
    };
    let page = repo.list(&filter).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page[0].id > page[1].id);
    assert_eq!(repo.count(&filter).await.unwrap(), 3);

    let paid = OrderFilter {
        status: Some(OrderStatus::Paid),
        ..OrderFilter::default()
    };
    let paid_orders = repo.list(&paid).await.unwrap();
    assert_eq!(paid_orders.len(), 1);
    assert_eq!(paid_orders[0].id, other.id);

    let theirs = repo
        .list_by_customer(&account("other@example.com"))
        .await
        .unwrap();
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].id, other.id);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_order_is_none() {
    let mongo = TestMongo::new().await;
    let repo = repository(&mongo).await;

    let ghost = Order::new(404, account("ghost@example.com"), input("ghost@example.com"));
    assert!(repo.update(ghost).await.unwrap().is_none());
}
