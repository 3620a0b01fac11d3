use axum::response::IntoResponse;
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{escape_html, hash_password_async, validate_email_format};
use crate::database::SharedStore;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::rest::{HandlerResult, RequestContext, RestEndpoint};

/// Body of POST /register. `password1` is the confirmation field.
#[derive(Debug, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub password1: String,
}

/// POST /register - create a user account
pub struct RegisterEndpoint {
    store: SharedStore,
}

impl RegisterEndpoint {
    pub fn endpoint(store: SharedStore) -> RestEndpoint<Self> {
        RestEndpoint::new("register", Self { store }).post(Self::post)
    }

    async fn post(self: Arc<Self>, ctx: RequestContext, _: ()) -> HandlerResult {
        let registration: Registration = ctx.json()?;
        let email = escape_html(&registration.email);
        let password = escape_html(&registration.password);
        let confirmation = escape_html(&registration.password1);

        validate_email_format(&email).map_err(ApiError::bad_request)?;

        if password != confirmation {
            return Err(ApiError::bad_request("Passwords are not equal"));
        }
        if password.is_empty() {
            return Err(ApiError::bad_request("Password cannot be empty"));
        }

        let hash = hash_password_async(password).await?;
        let user = self.store.create_user(&email, &hash).await?;
        tracing::info!(user = user.id, "user registered");

        Ok(ApiResponse::created(user).into_response())
    }
}
