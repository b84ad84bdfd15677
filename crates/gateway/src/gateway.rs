use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use common::{OrderId, ProductId, UserId};
use domain::{AuthIdentity, BasketItem, Order, Product, Provider, Timestamp, User};
use futures_util::future::{try_join, try_join3};
use serde_json::{Map, Value};

use crate::analytics::{AdminAnalytics, compute_analytics};
use crate::auth::{AuthProvider, Persistence};
use crate::files::FileStore;
use crate::query::{Direction, DocumentQuery};
use crate::store::{Document, DocumentStore};
use crate::{GatewayError, Result};

pub const USERS: &str = "users";
pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";

/// Sentinel that sorts after every character, used for prefix ranges.
const PREFIX_END: char = '\u{f8ff}';

/// Maximum values an array-contains-any filter accepts.
const MAX_KEYWORDS: usize = 10;

/// Tunables for catalog reads.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Products per catalog page.
    pub page_size: usize,
    /// Deadline for catalog reads and searches.
    pub request_timeout: Duration,
    /// Results per search sub-query.
    pub search_limit: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            request_timeout: Duration::from_secs(15),
            search_limit: 12,
        }
    }
}

/// One page of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Key of the last product on this page; pass it back for the next page.
    pub next_cursor: Option<ProductId>,
    /// Catalog size, only reported for the first page.
    pub total: Option<usize>,
}

/// Merged search results.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub products: Vec<Product>,
    /// Key of the last name match, if any name matched.
    pub cursor: Option<ProductId>,
}

/// Single façade over the identity provider, document store and file
/// storage.
///
/// Every capability is injected, so workflows can run against the hosted
/// services or the in-memory implementations alike.
#[derive(Clone)]
pub struct BackendGateway {
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    config: GatewayConfig,
}

impl BackendGateway {
    /// Creates a gateway with default tunables.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self::with_config(auth, documents, files, GatewayConfig::default())
    }

    pub fn with_config(
        auth: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            auth,
            documents,
            files,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Races an operation against the request deadline.
    ///
    /// When the deadline wins, the operation future is dropped, so a late
    /// result can never be observed.
    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.config.request_timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                metrics::counter!("gateway_timeouts_total", "operation" => operation).increment(1);
                tracing::warn!(
                    operation,
                    timeout_ms = self.config.request_timeout.as_millis() as u64,
                    "request timed out"
                );
                Err(GatewayError::Timeout)
            }
        }
    }

    // Account lifecycle

    #[tracing::instrument(skip(self, password))]
    pub async fn create_account(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        self.auth.create_account(email, password).await
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthIdentity> {
        self.auth.sign_in(email, password).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn sign_in_with_provider(&self, provider: Provider) -> Result<AuthIdentity> {
        self.auth.sign_in_with_provider(provider).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn password_reset(&self, email: &str) -> Result<()> {
        self.auth.password_reset(email).await
    }

    /// Keeps the sign-in across restarts.
    pub async fn set_auth_persistence(&self) -> Result<()> {
        self.auth.set_persistence(Persistence::Local).await
    }

    /// Re-authenticates with the current password, then sets a new one.
    #[tracing::instrument(skip_all)]
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        self.auth.reauthenticate(current_password).await?;
        self.auth.update_password(new_password).await
    }

    /// Re-authenticates with the current password, then changes the email.
    #[tracing::instrument(skip(self, current_password))]
    pub async fn update_email(&self, current_password: &str, new_email: &str) -> Result<()> {
        self.auth.reauthenticate(current_password).await?;
        self.auth.update_email(new_email).await
    }

    pub async fn current_user(&self) -> Option<AuthIdentity> {
        self.auth.current_user().await
    }

    // Users

    #[tracing::instrument(skip(self, user))]
    pub async fn add_user(&self, id: &UserId, user: &User) -> Result<()> {
        let data = serde_json::to_value(user)?;
        self.documents.set(USERS, id.as_str(), data).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        match self.documents.get(USERS, id.as_str()).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc.data)?)),
            None => Ok(None),
        }
    }

    /// Merges the given fields into the user's document.
    #[tracing::instrument(skip(self, fields))]
    pub async fn update_user(&self, id: &UserId, fields: Map<String, Value>) -> Result<()> {
        self.documents.update(USERS, id.as_str(), fields).await
    }

    /// First user document registered under the email.
    #[tracing::instrument(skip(self))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<(UserId, User)>> {
        let query = DocumentQuery::new().where_eq("email", email).limit(1);
        let Some(doc) = self.documents.query(USERS, &query).await?.into_iter().next() else {
            return Ok(None);
        };
        let user = serde_json::from_value(doc.data)?;
        Ok(Some((UserId::new(doc.id), user)))
    }

    /// Persists the basket on the user's document.
    #[tracing::instrument(skip(self, items))]
    pub async fn save_basket_items(&self, id: &UserId, items: &[BasketItem]) -> Result<()> {
        let mut fields = Map::new();
        fields.insert("basket".to_string(), serde_json::to_value(items)?);
        self.update_user(id, fields).await
    }

    // Products

    #[tracing::instrument(skip(self))]
    pub async fn get_all_products(&self) -> Result<Vec<Product>> {
        let docs = self.documents.query(PRODUCTS, &DocumentQuery::new()).await?;
        docs.into_iter().map(Document::into_typed).collect()
    }

    /// Reads one catalog page ordered by product key.
    ///
    /// The first page (no cursor) also reports the catalog size. Both pages
    /// are bounded by the request deadline.
    #[tracing::instrument(skip(self))]
    pub async fn get_products(&self, cursor: Option<&ProductId>) -> Result<ProductPage> {
        let mut query = DocumentQuery::new()
            .order_by_id()
            .limit(self.config.page_size);
        if let Some(cursor) = cursor {
            query = query.start_after(cursor.as_str());
        }

        self.with_deadline("get_products", async {
            let (docs, total) = match cursor {
                Some(_) => (self.documents.query(PRODUCTS, &query).await?, None),
                None => {
                    let (docs, total) = try_join(
                        self.documents.query(PRODUCTS, &query),
                        self.documents.count(PRODUCTS),
                    )
                    .await?;
                    (docs, Some(total))
                }
            };

            let next_cursor = docs.last().map(|doc| ProductId::new(doc.id.clone()));
            let products = docs
                .into_iter()
                .map(Document::into_typed)
                .collect::<Result<Vec<Product>>>()?;

            Ok(ProductPage {
                products,
                next_cursor,
                total,
            })
        })
        .await
    }

    /// Searches by name prefix and by keyword.
    ///
    /// Name matches come first, keyword matches are appended; a product
    /// found by both keeps its first position but takes the keyword-match
    /// data.
    #[tracing::instrument(skip(self))]
    pub async fn search_products(&self, term: &str) -> Result<SearchResult> {
        let term = term.trim().to_lowercase();
        let keywords: Vec<Value> = term
            .split_whitespace()
            .take(MAX_KEYWORDS)
            .map(|word| Value::String(word.to_string()))
            .collect();

        let by_name = DocumentQuery::new()
            .where_gte("name_lower", term.clone())
            .where_lte("name_lower", format!("{term}{PREFIX_END}"))
            .order_by("name_lower", Direction::Ascending)
            .limit(self.config.search_limit);
        let by_keyword = DocumentQuery::new()
            .where_array_contains_any("keywords", keywords)
            .order_by("dateAdded", Direction::Descending)
            .limit(self.config.search_limit);

        self.with_deadline("search_products", async {
            let (name_docs, keyword_docs) = try_join(
                self.documents.query(PRODUCTS, &by_name),
                self.documents.query(PRODUCTS, &by_keyword),
            )
            .await?;

            let cursor = name_docs.last().map(|doc| ProductId::new(doc.id.clone()));
            let name_matches = name_docs
                .into_iter()
                .map(Document::into_typed)
                .collect::<Result<Vec<Product>>>()?;
            let keyword_matches = keyword_docs
                .into_iter()
                .map(Document::into_typed)
                .collect::<Result<Vec<Product>>>()?;

            Ok(SearchResult {
                products: merge_by_id(name_matches, keyword_matches),
                cursor,
            })
        })
        .await
    }

    pub async fn get_single_product(&self, id: &ProductId) -> Result<Option<Product>> {
        self.documents
            .get(PRODUCTS, id.as_str())
            .await?
            .map(Document::into_typed)
            .transpose()
    }

    pub async fn get_featured_products(&self, count: usize) -> Result<Vec<Product>> {
        self.flagged_products("isFeatured", count).await
    }

    pub async fn get_recommended_products(&self, count: usize) -> Result<Vec<Product>> {
        self.flagged_products("isRecommended", count).await
    }

    async fn flagged_products(&self, flag: &str, count: usize) -> Result<Vec<Product>> {
        let query = DocumentQuery::new().where_eq(flag, true).limit(count);
        let docs = self.documents.query(PRODUCTS, &query).await?;
        docs.into_iter().map(Document::into_typed).collect()
    }

    /// A fresh product key.
    pub fn generate_key(&self) -> ProductId {
        ProductId::new(self.documents.generate_id(PRODUCTS))
    }

    #[tracing::instrument(skip(self, product))]
    pub async fn add_product(&self, id: &ProductId, product: &Product) -> Result<()> {
        let mut data = serde_json::to_value(product)?;
        // The key lives in the document path, not in the body
        if let Value::Object(map) = &mut data {
            map.remove("id");
        }
        self.documents.set(PRODUCTS, id.as_str(), data).await
    }

    #[tracing::instrument(skip(self, fields))]
    pub async fn edit_product(&self, id: &ProductId, fields: Map<String, Value>) -> Result<()> {
        self.documents.update(PRODUCTS, id.as_str(), fields).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, id: &ProductId) -> Result<()> {
        self.documents.delete(PRODUCTS, id.as_str()).await
    }

    /// Uploads an image and returns its download URL.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store_image(&self, id: &str, folder: &str, bytes: Vec<u8>) -> Result<String> {
        self.files.put(folder, id, bytes).await
    }

    /// Deletes a product image.
    #[tracing::instrument(skip(self))]
    pub async fn delete_image(&self, id: &str) -> Result<()> {
        self.files.delete(PRODUCTS, id).await
    }

    // Orders

    /// Distinct product keys across the user's past orders.
    ///
    /// Never fails: read errors are logged and yield an empty history.
    #[tracing::instrument(skip(self))]
    pub async fn get_user_purchase_history(&self, user_id: &UserId) -> Vec<ProductId> {
        let query = DocumentQuery::new().where_eq("userId", user_id.as_str());
        let orders = match self.documents.query(ORDERS, &query).await {
            Ok(orders) => orders,
            Err(e) => {
                tracing::error!(error = %e, %user_id, "failed to read purchase history");
                return Vec::new();
            }
        };

        let mut purchased: Vec<ProductId> = Vec::new();
        let item_ids = orders
            .iter()
            .filter_map(|order| order.data.get("items").and_then(Value::as_array))
            .flatten()
            .filter_map(|item| item.get("id").and_then(Value::as_str));
        for id in item_ids {
            if !purchased.iter().any(|p| p.as_str() == id) {
                purchased.push(ProductId::new(id));
            }
        }
        purchased
    }

    /// Persists an order stamped with a server timestamp.
    #[tracing::instrument(skip(self, order), fields(total = order.total_amount))]
    pub async fn create_order(&self, order: &Order) -> Result<OrderId> {
        let stamped = Order {
            created_at: Some(Timestamp::server_now()),
            ..order.clone()
        };
        let data = serde_json::to_value(&stamped)?;
        let id = self.documents.add(ORDERS, data).await?;
        metrics::counter!("orders_created_total").increment(1);
        Ok(OrderId::new(id))
    }

    /// Scans users, products and orders to build the admin dashboard.
    #[tracing::instrument(skip(self))]
    pub async fn get_admin_analytics(&self) -> Result<AdminAnalytics> {
        let all = DocumentQuery::new();
        let (users, product_count, orders) = try_join3(
            self.documents.query(USERS, &all),
            self.documents.count(PRODUCTS),
            self.documents.query(ORDERS, &all),
        )
        .await?;

        let users: Vec<Value> = users.into_iter().map(|doc| doc.data).collect();
        let orders: Vec<Value> = orders.into_iter().map(|doc| doc.data).collect();
        Ok(compute_analytics(&users, product_count, &orders))
    }
}

/// Concatenates both result lists, de-duplicating by product key.
///
/// A duplicate keeps the position of its first occurrence and the data of
/// its last.
pub fn merge_by_id(first: Vec<Product>, second: Vec<Product>) -> Vec<Product> {
    let mut merged: Vec<Product> = Vec::with_capacity(first.len() + second.len());
    for product in first.into_iter().chain(second) {
        match merged.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => merged.push(product),
        }
    }
    merged
}
