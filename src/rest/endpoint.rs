use axum::{http::Method, response::Response};
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

use super::context::RequestContext;
use crate::database::ItemId;
use crate::error::ApiError;

/// Parameters a handler declares beyond the request context itself.
///
/// Resolved once per request before the handler runs; a missing or
/// unparsable value fails the request with 400 and the handler never runs.
pub trait PathParams: Sized + Send + 'static {
    fn from_context(ctx: &RequestContext) -> Result<Self, ApiError>;
}

/// No parameters
impl PathParams for () {
    fn from_context(_ctx: &RequestContext) -> Result<Self, ApiError> {
        Ok(())
    }
}

/// The `pk` path segment as a row id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pk(pub ItemId);

impl PathParams for Pk {
    fn from_context(ctx: &RequestContext) -> Result<Self, ApiError> {
        let raw = ctx
            .param("pk")
            .ok_or_else(|| ApiError::bad_request("Missing path parameter 'pk'"))?;
        raw.parse::<ItemId>()
            .map(Pk)
            .map_err(|_| ApiError::bad_request(format!("Invalid path parameter 'pk': {}", raw)))
    }
}

pub type HandlerResult = Result<Response, ApiError>;

type BoxedHandler<S> = Arc<dyn Fn(Arc<S>, RequestContext) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Verb-to-handler table for one URL.
///
/// `S` is the endpoint's own state (store handle, keys); each handler receives
/// it along with the request context and its declared `PathParams`.
pub struct RestEndpoint<S> {
    name: &'static str,
    state: Arc<S>,
    methods: Vec<(Method, BoxedHandler<S>)>,
    requires_identity: bool,
}

impl<S> RestEndpoint<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(name: &'static str, state: S) -> Self {
        Self {
            name,
            state: Arc::new(state),
            methods: Vec::new(),
            requires_identity: false,
        }
    }

    /// Answer 401 for anonymous callers before any path parameter is read
    pub fn authenticated(mut self) -> Self {
        self.requires_identity = true;
        self
    }

    /// Register `handler` for `method`, replacing any earlier registration
    pub fn route<P, F, Fut>(mut self, method: Method, handler: F) -> Self
    where
        P: PathParams,
        F: Fn(Arc<S>, RequestContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let boxed: BoxedHandler<S> = Arc::new(move |state: Arc<S>, ctx: RequestContext| {
            match P::from_context(&ctx) {
                Ok(params) => handler(state, ctx, params).boxed(),
                Err(e) => future::ready(Err(e)).boxed(),
            }
        });
        self.methods.retain(|(m, _)| *m != method);
        self.methods.push((method, boxed));
        self
    }

    pub fn get<P, F, Fut>(self, handler: F) -> Self
    where
        P: PathParams,
        F: Fn(Arc<S>, RequestContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::GET, handler)
    }

    pub fn post<P, F, Fut>(self, handler: F) -> Self
    where
        P: PathParams,
        F: Fn(Arc<S>, RequestContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::POST, handler)
    }

    pub fn put<P, F, Fut>(self, handler: F) -> Self
    where
        P: PathParams,
        F: Fn(Arc<S>, RequestContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::PUT, handler)
    }

    pub fn delete<P, F, Fut>(self, handler: F) -> Self
    where
        P: PathParams,
        F: Fn(Arc<S>, RequestContext, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.route(Method::DELETE, handler)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Verbs in registration order
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.methods.iter().map(|(m, _)| m.clone()).collect()
    }

    pub async fn dispatch(&self, ctx: RequestContext) -> HandlerResult {
        let handler = self
            .methods
            .iter()
            .find(|(m, _)| *m == ctx.method)
            .map(|(_, h)| Arc::clone(h));

        let Some(handler) = handler else {
            tracing::debug!(endpoint = self.name, method = %ctx.method, "method not allowed");
            return Err(ApiError::method_not_allowed(self.allowed_methods()));
        };

        if self.requires_identity && !ctx.has_identity() {
            tracing::debug!(endpoint = self.name, method = %ctx.method, "anonymous request rejected");
            return Err(ApiError::unauthorized("Authentication required"));
        }

        tracing::debug!(endpoint = self.name, method = %ctx.method, "dispatching");
        handler(Arc::clone(&self.state), ctx).await
    }
}
