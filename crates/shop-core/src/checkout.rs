//! # Checkout
//!
//! Turns a cart into a persisted order with decremented stock.
//!
//! Validation (empty cart, non-positive quantities, unknown products,
//! insufficient stock) always runs to completion before the first write.
//! Writes then go through one of two paths, chosen by [`WriteMode`]:
//!
//! - `Transactional` hands the validated lines to
//!   [`CheckoutStore::commit_checkout`], which decrements stock
//!   conditionally and inserts the order in a single transaction.
//! - `Sequential` issues one unconditional quantity update per line, then
//!   the order, then each line item. A failed write aborts the checkout but
//!   earlier writes stay applied, and concurrent checkouts can overwrite
//!   each other's decrements.

use crate::error::{ShopError, ShopResult};
use crate::order::{CartItem, CheckoutReceipt, NewOrder, OrderLine};
use crate::product::Product;
use crate::store::CheckoutStore;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// How checkout persists stock and order writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// All-or-nothing with an atomic conditional decrement
    Transactional,
    /// Independent statements, no rollback
    Sequential,
}

impl Default for WriteMode {
    fn default() -> Self {
        WriteMode::Transactional
    }
}

impl FromStr for WriteMode {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(WriteMode::Transactional),
            "sequential" => Ok(WriteMode::Sequential),
            other => Err(ShopError::Configuration(format!(
                "unknown checkout write mode '{other}' (expected transactional or sequential)"
            ))),
        }
    }
}

/// Checkout orchestrator
#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn CheckoutStore>,
    mode: WriteMode,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn CheckoutStore>) -> Self {
        Self {
            store,
            mode: WriteMode::default(),
        }
    }

    /// Builder: set the write path
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Check out `items` on behalf of `user_id`
    #[instrument(skip(self, items), fields(items = items.len(), mode = ?self.mode))]
    pub async fn checkout(&self, user_id: i64, items: &[CartItem]) -> ShopResult<CheckoutReceipt> {
        let ids = cart_product_ids(items)?;

        let products = self.store.get_products_by_ids(&ids).await?;
        let lines = plan_lines(items, &products)?;
        let total = cart_total(&lines);

        let order = NewOrder::pending(user_id, total);
        let order_id = match self.mode {
            WriteMode::Transactional => self.store.commit_checkout(order, &lines).await?,
            WriteMode::Sequential => self.write_sequential(order, &lines).await?,
        };

        info!(order_id, user_id, total, "checkout completed");

        Ok(CheckoutReceipt {
            order_id,
            total_price: total,
        })
    }

    async fn write_sequential(&self, order: NewOrder, lines: &[OrderLine]) -> ShopResult<i64> {
        for line in lines {
            let new_quantity = line.stock_seen - line.quantity;
            self.store
                .update_product_quantity(line.product_id, new_quantity)
                .await
                .map_err(|e| {
                    warn!(product_id = line.product_id, error = %e, "stock write failed mid-checkout");
                    match e {
                        ShopError::Persistence(_) => e,
                        other => ShopError::persistence(other.to_string()),
                    }
                })?;
        }

        let order_id = self.store.create_order(order).await?;

        for line in lines {
            self.store.create_order_item(line.into_item(order_id)).await?;
        }

        Ok(order_id)
    }
}

/// Distinct product ids referenced by the cart, after the cheap checks.
///
/// Rejects an empty cart and any line with a non-positive quantity.
pub fn cart_product_ids(items: &[CartItem]) -> ShopResult<Vec<i64>> {
    if items.is_empty() {
        return Err(ShopError::invalid("cart is empty"));
    }

    let mut ids = BTreeSet::new();
    for item in items {
        if item.quantity <= 0 {
            return Err(ShopError::invalid(format!(
                "invalid quantity for product ID {}",
                item.product_id
            )));
        }
        ids.insert(item.product_id);
    }

    Ok(ids.into_iter().collect())
}

/// Match each cart line against the fetched products and check stock.
///
/// Lines are returned in submission order with the unit price snapshotted.
pub fn plan_lines(items: &[CartItem], products: &[Product]) -> ShopResult<Vec<OrderLine>> {
    let by_id: HashMap<i64, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = by_id
            .get(&item.product_id)
            .ok_or_else(|| ShopError::not_found(format!("product ID {} not found", item.product_id)))?;

        if !product.has_stock_for(item.quantity) {
            return Err(ShopError::InsufficientStock {
                product: product.name.clone(),
            });
        }

        lines.push(OrderLine::from_product(product, item.quantity));
    }

    Ok(lines)
}

/// Sum of line totals in submission order
pub fn cart_total(lines: &[OrderLine]) -> f64 {
    lines.iter().fold(0.0, |acc, line| acc + line.total())
}
