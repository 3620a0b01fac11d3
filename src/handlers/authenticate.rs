use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{escape_html, verify_password_async, TokenKeys};
use crate::database::SharedStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, CookieSettings};
use crate::rest::{HandlerResult, RequestContext, RestEndpoint};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Same answer for unknown email and wrong password
fn bad_credentials() -> ApiError {
    ApiError::bad_request("Bad authentication data")
}

/// POST /auth - check credentials and set the identity cookie
pub struct AuthenticateEndpoint {
    store: SharedStore,
    tokens: TokenKeys,
    cookie: CookieSettings,
}

impl AuthenticateEndpoint {
    pub fn endpoint(store: SharedStore, tokens: TokenKeys, cookie: CookieSettings) -> RestEndpoint<Self> {
        RestEndpoint::new("authenticate", Self { store, tokens, cookie }).post(Self::post)
    }

    async fn post(self: Arc<Self>, ctx: RequestContext, _: ()) -> HandlerResult {
        let credentials: Credentials = ctx.json()?;
        let email = escape_html(&credentials.email);
        let password = escape_html(&credentials.password);

        let Some(user) = self.store.user_by_email(&email).await? else {
            tracing::warn!("Authentication failed: no user with email {}", email);
            return Err(bad_credentials());
        };

        if !verify_password_async(password, user.password.clone()).await? {
            tracing::warn!("Authentication failed: wrong password for user {}", user.id);
            return Err(bad_credentials());
        }

        let token = self.tokens.issue(user.id)?;
        let jar = CookieJar::new().add(self.cookie.session(token));
        tracing::info!(user = user.id, "authenticated");

        Ok((jar, ApiResponse::success(json!({ "msg": "Authenticated" }))).into_response())
    }
}
