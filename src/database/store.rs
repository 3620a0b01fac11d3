use async_trait::async_trait;
use std::sync::Arc;

use super::manager::DatabaseError;
use super::models::{Item, ItemDraft, ItemId, User, UserId};

/// Data-store handle injected into every endpoint.
///
/// Item operations take the owner id and apply it inside the query, so a row
/// belonging to another user is indistinguishable from a missing one.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Insert a user. A taken email yields `DatabaseError::Conflict`.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError>;

    async fn list_items(&self, owner: UserId) -> Result<Vec<Item>, DatabaseError>;

    async fn item(&self, id: ItemId, owner: UserId) -> Result<Option<Item>, DatabaseError>;

    async fn create_item(&self, owner: UserId, draft: &ItemDraft) -> Result<Item, DatabaseError>;

    async fn update_item(
        &self,
        id: ItemId,
        owner: UserId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, DatabaseError>;

    /// Returns whether a row was removed
    async fn delete_item(&self, id: ItemId, owner: UserId) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub type SharedStore = Arc<dyn Store>;
