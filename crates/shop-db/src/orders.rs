use crate::store::{db_error, PgStore, INSERT_ORDER, INSERT_ORDER_ITEM};
use async_trait::async_trait;
use shop_core::{NewOrder, OrderItem, OrderStore, ShopResult};
use tracing::instrument;

#[async_trait]
impl OrderStore for PgStore {
    #[instrument(skip(self, order), fields(user_id = order.user_id))]
    async fn create_order(&self, order: NewOrder) -> ShopResult<i64> {
        sqlx::query_scalar(INSERT_ORDER)
            .bind(order.user_id)
            .bind(order.total)
            .bind(order.status.as_str())
            .bind(&order.address)
            .fetch_one(self.pool())
            .await
            .map_err(db_error("insert order"))
    }

    #[instrument(skip(self, item), fields(order_id = item.order_id, product_id = item.product_id))]
    async fn create_order_item(&self, item: OrderItem) -> ShopResult<()> {
        sqlx::query(INSERT_ORDER_ITEM)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(self.pool())
            .await
            .map_err(db_error("insert order item"))?;
        Ok(())
    }
}
