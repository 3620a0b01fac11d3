use axum::{middleware, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::database::SharedStore;
use crate::error::ApiError;
use crate::handlers::{
    AuthenticateEndpoint, HealthEndpoint, ItemDetailEndpoint, ItemListEndpoint, RegisterEndpoint,
};
use crate::middleware::{identity_middleware, CookieSettings, IdentityState};
use crate::rest::{credentialed_cors, RestResource, RestResources};

/// Build the full router over `store`
pub fn app(store: SharedStore, config: &AppConfig) -> Router {
    let tokens = TokenKeys::from_secret(&config.security.secret_key, config.security.jwt_expiry_hours);
    let cookie = CookieSettings {
        name: config.security.cookie_name.clone(),
        secure: config.security.cookie_secure,
    };

    let mut resources = RestResources::new()
        .add(RestResource::new("/items", ItemListEndpoint::endpoint(store.clone())))
        .add(RestResource::new("/items/:pk", ItemDetailEndpoint::endpoint(store.clone())))
        .add(RestResource::new(
            "/auth",
            AuthenticateEndpoint::endpoint(store.clone(), tokens.clone(), cookie.clone()),
        ))
        .add(RestResource::new("/register", RegisterEndpoint::endpoint(store.clone())))
        .add(RestResource::new("/health", HealthEndpoint::endpoint(store.clone())));

    if config.security.enable_cors {
        resources = resources.with_cors(credentialed_cors(&config.security.cors_origins));
    }

    let identity = IdentityState {
        store,
        tokens,
        cookie,
    };

    resources
        .into_router_with(|router| {
            router
                .fallback(|| async { ApiError::not_found("Route not found") })
                .layer(middleware::from_fn_with_state(identity, identity_middleware))
        })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs))),
        )
}
