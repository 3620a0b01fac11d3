use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::database::SharedStore;
use crate::rest::{HandlerResult, RequestContext, RestEndpoint};

/// GET /health - liveness plus a data-store ping
pub struct HealthEndpoint {
    store: SharedStore,
}

impl HealthEndpoint {
    pub fn endpoint(store: SharedStore) -> RestEndpoint<Self> {
        RestEndpoint::new("health", Self { store }).get(Self::get)
    }

    async fn get(self: Arc<Self>, _ctx: RequestContext, _: ()) -> HandlerResult {
        let now = chrono::Utc::now();

        let response = match self.store.health_check().await {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                })),
            ),
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    })),
                )
            }
        };

        Ok(response.into_response())
    }
}
