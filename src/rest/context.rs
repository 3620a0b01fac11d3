use axum::{body::Bytes, http::Method};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// Everything a handler may read from the incoming request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    params: HashMap<String, String>,
    identity: Option<Identity>,
    body: Bytes,
}

impl RequestContext {
    pub fn new(
        method: Method,
        params: HashMap<String, String>,
        identity: Option<Identity>,
        body: Bytes,
    ) -> Self {
        Self {
            method,
            params,
            identity,
            body,
        }
    }

    /// Raw captured path segment
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The authenticated caller, or `Unauthorized`
    pub fn identity(&self) -> Result<&Identity, ApiError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }

    pub fn has_identity(&self) -> bool {
        self.identity.is_some()
    }

    /// Parse the body as JSON; malformed or incomplete bodies are a 400
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.is_empty() {
            return Err(ApiError::invalid_json("Request body is required"));
        }
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::invalid_json(format!("Invalid request body: {}", e)))
    }
}
