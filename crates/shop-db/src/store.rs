//! # PostgreSQL Store
//!
//! Pool handle shared by the product, order, and user stores, plus the
//! transactional checkout write path.

use crate::config::DbConfig;
use async_trait::async_trait;
use shop_core::{CheckoutStore, NewOrder, OrderLine, ShopError, ShopResult};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info, instrument, warn};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open a pool against `config.url`
    pub async fn connect(config: &DbConfig) -> ShopResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(db_error("connect"))?;

        info!(max_connections = config.max_connections, "connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a sqlx failure to a persistence error, logging the detail
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> ShopError {
    move |e| {
        error!(error = %e, context, "database operation failed");
        ShopError::persistence(format!("{context}: {e}"))
    }
}

pub(crate) const INSERT_ORDER: &str = r#"
    INSERT INTO orders (user_id, total, status, address)
    VALUES ($1, $2, $3, $4)
    RETURNING id
"#;

pub(crate) const INSERT_ORDER_ITEM: &str = r#"
    INSERT INTO order_items (order_id, product_id, quantity, price)
    VALUES ($1, $2, $3, $4)
"#;

const DECREMENT_STOCK: &str = r#"
    UPDATE products
    SET quantity = quantity - $1
    WHERE id = $2 AND quantity >= $1
"#;

#[async_trait]
impl CheckoutStore for PgStore {
    #[instrument(skip(self, order, lines), fields(user_id = order.user_id, lines = lines.len()))]
    async fn commit_checkout(&self, order: NewOrder, lines: &[OrderLine]) -> ShopResult<i64> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin checkout"))?;

        for line in lines {
            let result = sqlx::query(DECREMENT_STOCK)
                .bind(line.quantity)
                .bind(line.product_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("decrement stock"))?;

            if result.rows_affected() == 0 {
                warn!(
                    product_id = line.product_id,
                    requested = line.quantity,
                    "stock changed under checkout, rolling back"
                );
                // Dropping `tx` rolls back earlier decrements.
                return Err(ShopError::InsufficientStock {
                    product: line.product_name.clone(),
                });
            }
        }

        let order_id: i64 = sqlx::query_scalar(INSERT_ORDER)
            .bind(order.user_id)
            .bind(order.total)
            .bind(order.status.as_str())
            .bind(&order.address)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("insert order"))?;

        for line in lines {
            let item = line.into_item(order_id);
            sqlx::query(INSERT_ORDER_ITEM)
                .bind(item.order_id)
                .bind(item.product_id)
                .bind(item.quantity)
                .bind(item.price)
                .execute(&mut *tx)
                .await
                .map_err(db_error("insert order item"))?;
        }

        tx.commit().await.map_err(db_error("commit checkout"))?;

        Ok(order_id)
    }
}
