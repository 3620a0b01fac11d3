use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::any,
    Extension, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::context::RequestContext;
use super::endpoint::RestEndpoint;
use crate::middleware::identity::Identity;

/// Binds one endpoint to one URL template (axum syntax, e.g. `/items/:pk`)
pub struct RestResource<S> {
    url: &'static str,
    endpoint: Arc<RestEndpoint<S>>,
}

impl<S> RestResource<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(url: &'static str, endpoint: RestEndpoint<S>) -> Self {
        Self {
            url,
            endpoint: Arc::new(endpoint),
        }
    }

    /// Route every verb on the URL to the endpoint's dispatch
    pub fn register(self, router: Router) -> Router {
        tracing::debug!(
            url = self.url,
            endpoint = self.endpoint.name(),
            methods = ?self.endpoint.allowed_methods(),
            "registering resource"
        );
        router.route(self.url, any(dispatch_entry::<S>).with_state(self.endpoint))
    }
}

/// Axum entry point shared by every resource
async fn dispatch_entry<S>(
    State(endpoint): State<Arc<RestEndpoint<S>>>,
    method: Method,
    params: Option<Path<HashMap<String, String>>>,
    identity: Option<Extension<Identity>>,
    body: Bytes,
) -> Response
where
    S: Send + Sync + 'static,
{
    let ctx = RequestContext::new(
        method,
        params.map(|Path(p)| p).unwrap_or_default(),
        identity.map(|Extension(i)| i),
        body,
    );

    match endpoint.dispatch(ctx).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// A set of resources sharing one CORS policy
pub struct RestResources {
    router: Router,
    cors: Option<CorsLayer>,
}

impl RestResources {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            cors: None,
        }
    }

    /// Wrap every registered route in `cors`
    pub fn with_cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    pub fn add<S>(mut self, resource: RestResource<S>) -> Self
    where
        S: Send + Sync + 'static,
    {
        self.router = resource.register(self.router);
        self
    }

    pub fn into_router(self) -> Router {
        self.into_router_with(|router| router)
    }

    /// Like `into_router`, with `inner` applied beneath the CORS layer so
    /// responses produced by inner middleware still carry CORS headers
    pub fn into_router_with(self, inner: impl FnOnce(Router) -> Router) -> Router {
        let router = inner(self.router);
        match self.cors {
            Some(cors) => router.layer(cors),
            None => router,
        }
    }
}

impl Default for RestResources {
    fn default() -> Self {
        Self::new()
    }
}

/// Credentialed CORS for any (or the listed) origins, any method and header.
///
/// Wildcards cannot be combined with credentials, so the request's own
/// origin, method and headers are mirrored back.
pub fn credentialed_cors(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH, header::ALLOW])
}
