//! # In-memory Store
//!
//! A [`ShopStore`](crate::store::ShopStore) backed by plain collections
//! behind one `RwLock`. Ids are assigned sequentially from 1, like a
//! fresh database. Used by tests and for running the API without Postgres.

use crate::error::{ShopError, ShopResult};
use crate::order::{NewOrder, Order, OrderItem, OrderLine};
use crate::product::{NewProduct, Product};
use crate::store::{CheckoutStore, OrderStore, ProductStore, UserStore};
use crate::user::{NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    order_items: Vec<OrderItem>,
    users: BTreeMap<i64, User>,
    next_product_id: i64,
    next_order_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn insert_order(&mut self, order: NewOrder) -> i64 {
        self.next_order_id += 1;
        let id = self.next_order_id;
        self.orders.insert(
            id,
            Order {
                id,
                user_id: order.user_id,
                total: order.total,
                status: order.status,
                address: order.address,
                created_at: Utc::now(),
            },
        );
        id
    }
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All orders, by id
    pub async fn orders(&self) -> Vec<Order> {
        self.tables.read().await.orders.values().cloned().collect()
    }

    /// Line items of one order, in insertion order
    pub async fn order_items(&self, order_id: i64) -> Vec<OrderItem> {
        self.tables
            .read()
            .await
            .order_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn create_product(&self, product: NewProduct) -> ShopResult<Product> {
        product.validate()?;

        let mut tables = self.tables.write().await;
        tables.next_product_id += 1;
        let product = product.into_product(tables.next_product_id, Utc::now());
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_products_by_ids(&self, ids: &[i64]) -> ShopResult<Vec<Product>> {
        if ids.is_empty() {
            return Err(ShopError::invalid("no product ids given"));
        }

        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.products.get(id))
            .cloned()
            .collect())
    }

    async fn update_product_quantity(&self, id: i64, quantity: i32) -> ShopResult<()> {
        let mut tables = self.tables.write().await;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or_else(|| ShopError::persistence(format!("product {id} does not exist")))?;
        if quantity < 0 {
            return Err(ShopError::persistence(format!(
                "quantity {quantity} violates products_quantity_check"
            )));
        }
        product.quantity = quantity;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: NewOrder) -> ShopResult<i64> {
        Ok(self.tables.write().await.insert_order(order))
    }

    async fn create_order_item(&self, item: OrderItem) -> ShopResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.orders.contains_key(&item.order_id) {
            return Err(ShopError::persistence(format!(
                "order {} does not exist",
                item.order_id
            )));
        }
        tables.order_items.push(item);
        Ok(())
    }
}

#[async_trait]
impl CheckoutStore for MemoryStore {
    async fn commit_checkout(&self, order: NewOrder, lines: &[OrderLine]) -> ShopResult<i64> {
        let mut tables = self.tables.write().await;

        // Work on a copy of the stock so a failing line leaves nothing behind.
        let mut stock: BTreeMap<i64, i32> = BTreeMap::new();
        for line in lines {
            let current = match stock.get(&line.product_id) {
                Some(q) => *q,
                None => tables
                    .products
                    .get(&line.product_id)
                    .map(|p| p.quantity)
                    .ok_or_else(|| {
                        ShopError::not_found(format!("product ID {} not found", line.product_id))
                    })?,
            };
            if current < line.quantity {
                return Err(ShopError::InsufficientStock {
                    product: line.product_name.clone(),
                });
            }
            stock.insert(line.product_id, current - line.quantity);
        }

        for (id, quantity) in stock {
            if let Some(product) = tables.products.get_mut(&id) {
                product.quantity = quantity;
            }
        }

        let order_id = tables.insert_order(order);
        tables
            .order_items
            .extend(lines.iter().map(|line| line.into_item(order_id)));

        Ok(order_id)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> ShopResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> ShopResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(ShopError::invalid(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        tables.next_user_id += 1;
        let user = user.into_user(tables.next_user_id, Utc::now());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
