// Store contract against a real Postgres. Skipped unless DATABASE_URL is set.

use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use board_api::config::DatabaseConfig;
use board_api::database::{DatabaseError, DatabaseManager, ItemDraft, PgStore, Store};

static SCHEMA_READY: Mutex<bool> = Mutex::const_new(false);

async fn store() -> Result<Option<PgStore>> {
    let _ = dotenvy::dotenv();
    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping Postgres store test");
            return Ok(None);
        }
    };

    let pool = DatabaseManager::connect(&config).await?;

    // Tests in this binary run concurrently; create the tables once
    let mut ready = SCHEMA_READY.lock().await;
    if !*ready {
        DatabaseManager::create_schema(&pool).await?;
        *ready = true;
    }

    Ok(Some(PgStore::new(pool)))
}

/// Emails unique across runs against the same database
fn email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}-{}@store.test", tag, std::process::id(), nanos)
}

fn draft(title: &str) -> ItemDraft {
    ItemDraft {
        title: title.to_string(),
        text: "text".to_string(),
    }
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let address = email("dup");
    let user = store.create_user(&address, "hash").await?;
    assert_eq!(user.email, address);

    let err = store.create_user(&address, "hash").await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)), "unexpected error: {err:?}");

    // The failed insert rolled back and the first row is intact
    let found = store.user_by_email(&address).await?.unwrap();
    assert_eq!(found.id, user.id);
    Ok(())
}

#[tokio::test]
async fn items_are_invisible_to_other_owners() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let alice = store.create_user(&email("alice"), "h").await?;
    let bob = store.create_user(&email("bob"), "h").await?;

    let item = store.create_item(alice.id, &draft("mine")).await?;
    assert_eq!(item.created_by, alice.id);

    assert!(store.item(item.id, bob.id).await?.is_none());
    assert!(store.update_item(item.id, bob.id, &draft("theirs")).await?.is_none());
    assert!(!store.delete_item(item.id, bob.id).await?);
    assert!(store.list_items(bob.id).await?.is_empty());

    let kept = store.item(item.id, alice.id).await?.unwrap();
    assert_eq!(kept.title, "mine");
    assert_eq!(store.list_items(alice.id).await?, vec![kept]);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_own_item() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };

    let user = store.create_user(&email("owner"), "h").await?;
    let item = store.create_item(user.id, &draft("old")).await?;

    let updated = store
        .update_item(
            item.id,
            user.id,
            &ItemDraft {
                title: "new".into(),
                text: "body".into(),
            },
        )
        .await?
        .unwrap();
    assert_eq!(updated.title, "new");
    assert_eq!(updated.text, "body");
    assert_eq!(updated.created_at, item.created_at);

    assert!(store.delete_item(item.id, user.id).await?);
    assert!(!store.delete_item(item.id, user.id).await?);
    assert!(store.item(item.id, user.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn health_check_reaches_database() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };
    store.health_check().await?;
    Ok(())
}
