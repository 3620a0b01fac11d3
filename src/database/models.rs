use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i32;
pub type ItemId = i32;

pub const TITLE_MAX_CHARS: usize = 64;
pub const TEXT_MAX_CHARS: usize = 255;
pub const EMAIL_MAX_CHARS: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Argon2 PHC string, never serialized
    #[serde(skip_serializing, default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
}

/// Writable item fields, already sanitized and length-checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub text: String,
}
