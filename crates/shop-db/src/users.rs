use crate::store::{db_error, PgStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shop_core::{NewUser, ShopError, ShopResult, User, UserStore};
use tracing::instrument;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password: row.password,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> ShopResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error("select user by email"))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self))]
    async fn get_user_by_id(&self, id: i64) -> ShopResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, first_name, last_name, email, password, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(db_error("select user by id"))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewUser) -> ShopResult<User> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email, password, created_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => Err(
                ShopError::invalid(format!("user with email {} already exists", user.email)),
            ),
            Err(e) => Err(db_error("insert user")(e)),
        }
    }
}
