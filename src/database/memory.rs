use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{Item, ItemDraft, ItemId, User, UserId};
use super::store::Store;

/// Process-local store with the same contract as `PgStore`.
///
/// Backs development runs without `DATABASE_URL` and the test suite. Contents
/// are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    items: BTreeMap<ItemId, Item>,
    next_user_id: UserId,
    next_item_id: ItemId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, DatabaseError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::Conflict("Email is not unique".to_string()));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            password: password_hash.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn list_items(&self, owner: UserId) -> Result<Vec<Item>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| item.created_by == owner)
            .cloned()
            .collect())
    }

    async fn item(&self, id: ItemId, owner: UserId) -> Result<Option<Item>, DatabaseError> {
        let tables = self.inner.read().await;
        Ok(tables
            .items
            .get(&id)
            .filter(|item| item.created_by == owner)
            .cloned())
    }

    async fn create_item(&self, owner: UserId, draft: &ItemDraft) -> Result<Item, DatabaseError> {
        let mut tables = self.inner.write().await;
        tables.next_item_id += 1;
        let item = Item {
            id: tables.next_item_id,
            title: draft.title.clone(),
            text: draft.text.clone(),
            created_at: Utc::now(),
            created_by: owner,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        id: ItemId,
        owner: UserId,
        draft: &ItemDraft,
    ) -> Result<Option<Item>, DatabaseError> {
        let mut tables = self.inner.write().await;
        match tables.items.get_mut(&id) {
            Some(item) if item.created_by == owner => {
                item.title = draft.title.clone();
                item.text = draft.text.clone();
                Ok(Some(item.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_item(&self, id: ItemId, owner: UserId) -> Result<bool, DatabaseError> {
        let mut tables = self.inner.write().await;
        let owned = tables
            .items
            .get(&id)
            .is_some_and(|item| item.created_by == owner);
        if owned {
            tables.items.remove(&id);
        }
        Ok(owned)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ItemDraft {
        ItemDraft {
            title: title.to_string(),
            text: "text".to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("a@b.io", "hash").await.unwrap();
        let err = store.create_user("a@b.io", "hash").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn items_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice@b.io", "h").await.unwrap();
        let bob = store.create_user("bob@b.io", "h").await.unwrap();

        let item = store.create_item(alice.id, &draft("mine")).await.unwrap();
        assert_eq!(item.created_by, alice.id);

        assert_eq!(store.list_items(alice.id).await.unwrap().len(), 1);
        assert!(store.list_items(bob.id).await.unwrap().is_empty());
        assert!(store.item(item.id, bob.id).await.unwrap().is_none());
        assert!(store.update_item(item.id, bob.id, &draft("theirs")).await.unwrap().is_none());
        assert!(!store.delete_item(item.id, bob.id).await.unwrap());

        // Bob's attempts left it intact
        let kept = store.item(item.id, alice.id).await.unwrap().unwrap();
        assert_eq!(kept.title, "mine");
    }

    #[tokio::test]
    async fn delete_is_reported_once() {
        let store = MemoryStore::new();
        let user = store.create_user("c@b.io", "h").await.unwrap();
        let item = store.create_item(user.id, &draft("gone")).await.unwrap();
        assert!(store.delete_item(item.id, user.id).await.unwrap());
        assert!(!store.delete_item(item.id, user.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_replaces_title_and_text() {
        let store = MemoryStore::new();
        let user = store.create_user("d@b.io", "h").await.unwrap();
        let item = store.create_item(user.id, &draft("old")).await.unwrap();
        let updated = store
            .update_item(
                item.id,
                user.id,
                &ItemDraft {
                    title: "new".into(),
                    text: "body".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.text, "body");
        assert_eq!(updated.created_at, item.created_at);
    }
}
