// Item CRUD, always scoped to the authenticated owner.
//
// A row that exists but belongs to someone else gets the same 404 as a row
// that does not exist at all.

use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::escape_html;
use crate::database::models::{TEXT_MAX_CHARS, TITLE_MAX_CHARS};
use crate::database::{ItemDraft, SharedStore};
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::rest::{HandlerResult, Pk, RequestContext, RestEndpoint};

/// Body of POST /items and PUT /items/:pk
#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub title: String,
    pub text: String,
}

impl ItemInput {
    /// Escape both fields and enforce the column limits on the stored form
    pub fn into_draft(self) -> Result<ItemDraft, ApiError> {
        let draft = ItemDraft {
            title: escape_html(&self.title),
            text: escape_html(&self.text),
        };

        let mut field_errors = HashMap::new();
        if draft.title.chars().count() > TITLE_MAX_CHARS {
            field_errors.insert(
                "title".to_string(),
                format!("Must be at most {} characters", TITLE_MAX_CHARS),
            );
        }
        if draft.text.chars().count() > TEXT_MAX_CHARS {
            field_errors.insert(
                "text".to_string(),
                format!("Must be at most {} characters", TEXT_MAX_CHARS),
            );
        }

        if field_errors.is_empty() {
            Ok(draft)
        } else {
            Err(ApiError::validation_error("Invalid item", Some(field_errors)))
        }
    }
}

fn item_not_found() -> ApiError {
    ApiError::not_found("Item not found")
}

/// `/items`: GET lists the caller's items, POST creates one
pub struct ItemListEndpoint {
    store: SharedStore,
}

impl ItemListEndpoint {
    pub fn endpoint(store: SharedStore) -> RestEndpoint<Self> {
        RestEndpoint::new("item-list", Self { store })
            .authenticated()
            .get(Self::get)
            .post(Self::post)
    }

    async fn get(self: Arc<Self>, ctx: RequestContext, _: ()) -> HandlerResult {
        let owner = ctx.identity()?.id;
        let items = self.store.list_items(owner).await?;
        Ok(ApiResponse::success(json!({ "items": items })).into_response())
    }

    async fn post(self: Arc<Self>, ctx: RequestContext, _: ()) -> HandlerResult {
        let owner = ctx.identity()?.id;
        let draft = ctx.json::<ItemInput>()?.into_draft()?;
        let item = self.store.create_item(owner, &draft).await?;
        tracing::info!(item = item.id, owner, "item created");
        Ok(ApiResponse::created(item).into_response())
    }
}

/// `/items/:pk`: read, replace or delete one owned item
pub struct ItemDetailEndpoint {
    store: SharedStore,
}

impl ItemDetailEndpoint {
    pub fn endpoint(store: SharedStore) -> RestEndpoint<Self> {
        RestEndpoint::new("item-detail", Self { store })
            .authenticated()
            .get(Self::get)
            .put(Self::put)
            .delete(Self::delete)
    }

    async fn get(self: Arc<Self>, ctx: RequestContext, Pk(pk): Pk) -> HandlerResult {
        let owner = ctx.identity()?.id;
        let item = self.store.item(pk, owner).await?.ok_or_else(item_not_found)?;
        Ok(ApiResponse::success(item).into_response())
    }

    async fn put(self: Arc<Self>, ctx: RequestContext, Pk(pk): Pk) -> HandlerResult {
        let owner = ctx.identity()?.id;
        let draft = ctx.json::<ItemInput>()?.into_draft()?;
        let item = self
            .store
            .update_item(pk, owner, &draft)
            .await?
            .ok_or_else(item_not_found)?;
        tracing::info!(item = item.id, owner, "item updated");
        Ok(ApiResponse::success(item).into_response())
    }

    async fn delete(self: Arc<Self>, ctx: RequestContext, Pk(pk): Pk) -> HandlerResult {
        let owner = ctx.identity()?.id;
        if !self.store.delete_item(pk, owner).await? {
            return Err(item_not_found());
        }
        tracing::info!(item = pk, owner, "item deleted");
        Ok(ApiResponse::no_content().into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_is_escaped() {
        let draft = ItemInput {
            title: "<i>hi</i>".into(),
            text: "a & b".into(),
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.title, "&lt;i&gt;hi&lt;/i&gt;");
        assert_eq!(draft.text, "a &amp; b");
    }

    #[test]
    fn overlong_fields_are_rejected_per_field() {
        let err = ItemInput {
            title: "t".repeat(TITLE_MAX_CHARS + 1),
            text: "x".repeat(TEXT_MAX_CHARS + 1),
        }
        .into_draft()
        .unwrap_err();
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["title"].is_string());
        assert!(body["field_errors"]["text"].is_string());
    }

    #[test]
    fn escaping_counts_toward_the_limit() {
        // 13 '&' become 65 characters once escaped
        let err = ItemInput {
            title: "&".repeat(13),
            text: String::new(),
        }
        .into_draft()
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
