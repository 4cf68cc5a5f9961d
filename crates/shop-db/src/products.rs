use crate::store::{db_error, PgStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{NewProduct, Product, ProductStore, ShopError, ShopResult};
use tracing::instrument;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    image: String,
    price: f64,
    quantity: i32,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            image: row.image,
            price: row.price,
            quantity: row.quantity,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    #[instrument(skip(self))]
    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image, price, quantity, created_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(db_error("list products"))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    async fn create_product(&self, product: NewProduct) -> ShopResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, description, image, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, image, price, quantity, created_at
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.price)
        .bind(product.quantity)
        .fetch_one(self.pool())
        .await
        .map_err(db_error("insert product"))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn get_products_by_ids(&self, ids: &[i64]) -> ShopResult<Vec<Product>> {
        if ids.is_empty() {
            return Err(ShopError::invalid("no product ids given"));
        }

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, image, price, quantity, created_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await
        .map_err(db_error("select products by id"))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn update_product_quantity(&self, id: i64, quantity: i32) -> ShopResult<()> {
        let result = sqlx::query("UPDATE products SET quantity = $1 WHERE id = $2")
            .bind(quantity)
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(db_error("update product quantity"))?;

        if result.rows_affected() == 0 {
            return Err(ShopError::persistence(format!("product {id} does not exist")));
        }
        Ok(())
    }
}
