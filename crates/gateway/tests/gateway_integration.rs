//! Integration tests for the backend gateway over in-memory capabilities.

use std::sync::Arc;
use std::time::Duration;

use common::{ProductId, UserId};
use domain::{
    AuthIdentity, BasketItem, Order, PaymentDetails, Product, Provider, ProviderId, Shipping,
    Timestamp, User,
};
use gateway::{
    AuthErrorCode, BackendGateway, DocumentStore, GatewayError, InMemoryAuthProvider,
    InMemoryDocumentStore, InMemoryFileStore, ORDERS, PRODUCTS, Persistence,
};
use serde_json::json;

struct TestHarness {
    gateway: BackendGateway,
    auth: InMemoryAuthProvider,
    documents: InMemoryDocumentStore,
    files: InMemoryFileStore,
}

impl TestHarness {
    fn new() -> Self {
        let auth = InMemoryAuthProvider::new();
        let documents = InMemoryDocumentStore::new();
        let files = InMemoryFileStore::new();
        let gateway = BackendGateway::new(
            Arc::new(auth.clone()),
            Arc::new(documents.clone()),
            Arc::new(files.clone()),
        );
        Self {
            gateway,
            auth,
            documents,
            files,
        }
    }

    async fn seed_products(&self, count: usize) {
        for i in 0..count {
            let product = Product::new(format!("p{i:02}"), format!("Product {i}"), 1.0);
            self.gateway
                .add_product(&product.id, &product)
                .await
                .unwrap();
        }
    }

    async fn seed_order(&self, user_id: &str, item_ids: &[&str]) {
        let items: Vec<_> = item_ids
            .iter()
            .map(|id| json!({ "id": id, "name": id, "price": 1.0, "quantity": 1 }))
            .collect();
        self.documents
            .add(ORDERS, json!({ "userId": user_id, "items": items, "totalAmount": 1.0 }))
            .await
            .unwrap();
    }
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_pagination_reports_total_on_first_page_only() {
    let h = TestHarness::new();
    h.seed_products(15).await;

    let first = h.gateway.get_products(None).await.unwrap();
    assert_eq!(first.products.len(), 12);
    assert_eq!(first.total, Some(15));
    assert_eq!(first.next_cursor, Some(ProductId::new("p11")));
    assert_eq!(first.products[0].id.as_str(), "p00");

    let second = h
        .gateway
        .get_products(first.next_cursor.as_ref())
        .await
        .unwrap();
    assert_eq!(ids(&second.products), vec!["p12", "p13", "p14"]);
    assert_eq!(second.total, None);
    assert_eq!(second.next_cursor, Some(ProductId::new("p14")));
}

#[tokio::test]
async fn test_empty_catalog_page() {
    let h = TestHarness::new();
    let page = h.gateway.get_products(None).await.unwrap();
    assert!(page.products.is_empty());
    assert_eq!(page.total, Some(0));
    assert!(page.next_cursor.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slow_first_page_times_out_and_late_result_is_discarded() {
    let h = TestHarness::new();
    h.seed_products(3).await;
    h.documents.set_read_latency(Duration::from_secs(20));

    let result = h.gateway.get_products(None).await;
    assert!(matches!(result, Err(GatewayError::Timeout)));

    // The losing reads were dropped at the deadline and never complete
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.documents.reads_completed(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_read_under_deadline_succeeds() {
    let h = TestHarness::new();
    h.seed_products(3).await;
    h.documents.set_read_latency(Duration::from_secs(14));

    let page = h.gateway.get_products(None).await.unwrap();
    assert_eq!(page.products.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_slow_search_times_out() {
    let h = TestHarness::new();
    h.documents.set_read_latency(Duration::from_secs(16));
    let result = h.gateway.search_products("shirt").await;
    assert!(matches!(result, Err(GatewayError::Timeout)));
}

#[tokio::test]
async fn test_search_deduplicates_with_keyword_match_winning() {
    let h = TestHarness::new();

    // Name match for "red shirt"
    h.documents
        .set(
            PRODUCTS,
            "a",
            json!({ "name": "Red Shirt", "name_lower": "red shirt", "price": 10.0,
                    "keywords": [], "dateAdded": 1 }),
        )
        .await
        .unwrap();
    // Keyword-only match
    h.documents
        .set(
            PRODUCTS,
            "b",
            json!({ "name": "Crimson Tee", "name_lower": "crimson tee", "price": 9.0,
                    "keywords": ["shirt"], "dateAdded": 2 }),
        )
        .await
        .unwrap();

    let before = h.gateway.search_products("Red Shirt").await.unwrap();
    assert_eq!(ids(&before.products), vec!["a", "b"]);
    assert_eq!(before.cursor, Some(ProductId::new("a")));

    // Now "a" is found by both queries with different data
    h.documents
        .set(
            PRODUCTS,
            "a",
            json!({ "name": "Red Shirt", "name_lower": "red shirt", "price": 12.5,
                    "keywords": ["red"], "dateAdded": 3 }),
        )
        .await
        .unwrap();

    let result = h.gateway.search_products("red shirt").await.unwrap();
    assert_eq!(ids(&result.products), vec!["a", "b"]);
    assert_eq!(result.products[0].price, 12.5);
}

#[tokio::test]
async fn test_search_without_name_match_has_no_cursor() {
    let h = TestHarness::new();
    h.documents
        .set(
            PRODUCTS,
            "b",
            json!({ "name": "Crimson Tee", "name_lower": "crimson tee",
                    "keywords": ["shirt"], "dateAdded": 2 }),
        )
        .await
        .unwrap();

    let result = h.gateway.search_products("shirt").await.unwrap();
    assert_eq!(ids(&result.products), vec!["b"]);
    assert!(result.cursor.is_none());
}

#[tokio::test]
async fn test_purchase_history_without_orders_is_empty() {
    let h = TestHarness::new();
    let history = h
        .gateway
        .get_user_purchase_history(&UserId::new("nobody"))
        .await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_purchase_history_on_read_error_is_empty() {
    let h = TestHarness::new();
    h.seed_order("u1", &["p1"]).await;
    h.documents.set_fail_on_read(true);

    let history = h.gateway.get_user_purchase_history(&UserId::new("u1")).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_purchase_history_is_distinct_and_scoped_to_user() {
    let h = TestHarness::new();
    h.seed_order("u1", &["p1", "p2"]).await;
    h.seed_order("u1", &["p2", "p3"]).await;
    h.seed_order("u2", &["p9"]).await;

    let mut history = h.gateway.get_user_purchase_history(&UserId::new("u1")).await;
    history.sort();
    assert_eq!(
        history,
        vec![ProductId::new("p1"), ProductId::new("p2"), ProductId::new("p3")]
    );
}

#[tokio::test]
async fn test_create_order_stamps_server_time() {
    let h = TestHarness::new();
    let shipping = Shipping {
        is_international: true,
        is_done: true,
        ..Default::default()
    };
    let order = Order::from_checkout(
        Some(UserId::new("u1")),
        &[BasketItem::new("p1", "Shirt", 10.0, 2)],
        &shipping,
        &PaymentDetails::paypal(),
    )
    .unwrap();

    let order_id = h.gateway.create_order(&order).await.unwrap();
    let stored = h
        .documents
        .get(ORDERS, order_id.as_str())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(stored.data["totalAmount"], 70.0);
    assert!(stored.data["createdAt"]["seconds"].is_i64());
    assert_eq!(stored.data["userId"], "u1");
}

#[tokio::test]
async fn test_user_documents() {
    let h = TestHarness::new();
    let id = UserId::new("u1");
    let user = User::registration("jane doe", "jane@example.com", Timestamp::Millis(1));
    h.gateway.add_user(&id, &user).await.unwrap();

    let (found_id, found) = h
        .gateway
        .find_user_by_email("jane@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found_id, id);
    assert!(!found.email_verified);

    let mut fields = serde_json::Map::new();
    fields.insert("emailVerified".to_string(), json!(true));
    h.gateway.update_user(&id, fields).await.unwrap();
    h.gateway
        .save_basket_items(&id, &[BasketItem::new("p1", "Shirt", 10.0, 1)])
        .await
        .unwrap();

    let reloaded = h.gateway.get_user(&id).await.unwrap().unwrap();
    assert!(reloaded.email_verified);
    assert_eq!(reloaded.basket.len(), 1);
    assert_eq!(reloaded.fullname, "Jane Doe");

    assert!(h.gateway.get_user(&UserId::new("ghost")).await.unwrap().is_none());
    assert!(
        h.gateway
            .find_user_by_email("ghost@example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_product_admin_operations() {
    let h = TestHarness::new();
    let id = h.gateway.generate_key();
    let mut product = Product::new(id.clone(), "Blue Jacket", 99.0);
    product.is_featured = true;
    h.gateway.add_product(&id, &product).await.unwrap();

    let stored = h.documents.get(PRODUCTS, id.as_str()).await.unwrap().unwrap();
    assert!(stored.data.get("id").is_none());

    let featured = h.gateway.get_featured_products(12).await.unwrap();
    assert_eq!(featured.len(), 1);
    assert!(h.gateway.get_recommended_products(12).await.unwrap().is_empty());

    let mut fields = serde_json::Map::new();
    fields.insert("price".to_string(), json!(79.0));
    h.gateway.edit_product(&id, fields).await.unwrap();
    let edited = h.gateway.get_single_product(&id).await.unwrap().unwrap();
    assert_eq!(edited.price, 79.0);
    assert_eq!(edited.id, id);

    let url = h
        .gateway
        .store_image(id.as_str(), PRODUCTS, vec![1, 2, 3])
        .await
        .unwrap();
    assert!(url.ends_with(id.as_str()));
    assert_eq!(h.files.object_count(), 1);
    h.gateway.delete_image(id.as_str()).await.unwrap();
    assert_eq!(h.files.object_count(), 0);
    assert!(h.gateway.delete_image(id.as_str()).await.is_err());

    h.gateway.remove_product(&id).await.unwrap();
    assert!(h.gateway.get_single_product(&id).await.unwrap().is_none());
    assert!(h.gateway.get_all_products().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_analytics_scans_all_collections() {
    let h = TestHarness::new();
    h.seed_products(2).await;
    h.gateway
        .add_user(
            &UserId::new("u1"),
            &User::registration("a", "a@b.c", Timestamp::Text("2024-05-02T00:00:00Z".into())),
        )
        .await
        .unwrap();
    h.documents
        .add(
            ORDERS,
            json!({ "totalAmount": 70.0, "createdAt": { "seconds": 1714608000, "nanoseconds": 0 } }),
        )
        .await
        .unwrap();

    let analytics = h.gateway.get_admin_analytics().await.unwrap();
    assert_eq!(analytics.stats.users, 1);
    assert_eq!(analytics.stats.products, 2);
    assert_eq!(analytics.stats.orders, 1);
    assert_eq!(analytics.stats.revenue, 70.0);
    assert_eq!(analytics.monthly_users[0].month, "May");
    assert_eq!(analytics.monthly_revenue[0].month, "May");
}

#[tokio::test]
async fn test_account_lifecycle_through_gateway() {
    let h = TestHarness::new();
    let created = h.gateway.create_account("a@b.c", "secret1").await.unwrap();
    assert_eq!(created.provider_id, ProviderId::Password);

    h.gateway.set_auth_persistence().await.unwrap();
    assert_eq!(h.auth.persistence(), Some(Persistence::Local));

    h.gateway.change_password("secret1", "secret2").await.unwrap();
    let err = h
        .gateway
        .change_password("secret1", "secret3")
        .await
        .unwrap_err();
    assert_eq!(err.auth_code(), Some(&AuthErrorCode::WrongPassword));

    h.gateway.update_email("secret2", "new@b.c").await.unwrap();
    assert_eq!(h.gateway.current_user().await.unwrap().email, "new@b.c");

    h.gateway.password_reset("new@b.c").await.unwrap();
    assert_eq!(h.auth.reset_emails(), vec!["new@b.c".to_string()]);

    h.gateway.sign_out().await.unwrap();
    assert!(h.gateway.current_user().await.is_none());
}

#[tokio::test]
async fn test_federated_sign_in() {
    let h = TestHarness::new();
    let identity = AuthIdentity {
        uid: UserId::new("g1"),
        email: "g@b.c".to_string(),
        display_name: Some("G".to_string()),
        photo_url: None,
        provider_id: ProviderId::Google,
        creation_time: None,
    };
    h.auth.register_federated(Provider::Google, identity.clone());

    let signed_in = h.gateway.sign_in_with_provider(Provider::Google).await.unwrap();
    assert_eq!(signed_in, identity);
}
