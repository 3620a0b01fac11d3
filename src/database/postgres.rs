use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::DatabaseError;
use super::models::{Item, ItemDraft, ItemId, User, UserId};
use super::store::Store;

const ITEM_COLUMNS: &str = "id, title, text, created_at, created_by";

/// Postgres-backed store. Every mutation runs in its own transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_unique_violation(err: sqlx::Error, message: &str) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DatabaseError::Conflict(message.to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id, email, password",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "Email is not unique"))?;
        tx.commit().await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>("SELECT id, email, password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list_items(&self, owner: UserId) -> Result<Vec<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE created_by = $1 ORDER BY id");
        let items = sqlx::query_as::<_, Item>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn item(&self, id: ItemId, owner: UserId) -> Result<Option<Item>, DatabaseError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 AND created_by = $2");
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn create_item(&self, owner: UserId, draft: &ItemDraft) -> Result<Item, DatabaseError> {
        let sql = format!(
            "INSERT INTO items (title, text, created_by) VALUES ($1, $2, $3) RETURNING {ITEM_COLUMNS}"
        );
        let mut tx = self.pool.begin().await?;
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(&draft.title)
            .bind(&draft.text)
            .bind(owner)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn update_item(
        &self,
        id: ItemId,
        owner: UserId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, DatabaseError> {
        let sql = format!(
            "UPDATE items SET title = $1, text = $2 WHERE id = $3 AND created_by = $4 RETURNING {ITEM_COLUMNS}"
        );
        let mut tx = self.pool.begin().await?;
        let item = sqlx::query_as::<_, Item>(&sql)
            .bind(&draft.title)
            .bind(&draft.text)
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(item)
    }

    async fn delete_item(&self, id: ItemId, owner: UserId) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM items WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
