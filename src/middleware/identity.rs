use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::auth::{TokenError, TokenKeys};
use crate::database::{SharedStore, User, UserId};
use crate::error::ApiError;

/// The authenticated user attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// Shape of the identity cookie
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl CookieSettings {
    pub fn session(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .build()
    }

    /// Add a removal cookie for the identity cookie to `jar`
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build((self.name.clone(), "")).path("/"))
    }
}

#[derive(Clone)]
pub struct IdentityState {
    pub store: SharedStore,
    pub tokens: TokenKeys,
    pub cookie: CookieSettings,
}

/// Resolve the identity cookie into an `Identity` request extension.
///
/// Wraps every routed request. Without a usable token the request
/// continues anonymously; only an expired token short-circuits, with 401 and
/// the cookie removed.
pub async fn identity_middleware(
    State(state): State<IdentityState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match jar.get(&state.cookie.name) {
        Some(cookie) => cookie.value().to_string(),
        None => return next.run(request).await,
    };

    match state.tokens.verify(&token) {
        Ok(claims) => match state.store.user_by_id(claims.user_id).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(Identity::from(user));
            }
            Ok(None) => {
                tracing::debug!("Token names unknown user {}", claims.user_id);
            }
            Err(e) => return ApiError::from(e).into_response(),
        },
        Err(TokenError::Expired) => {
            tracing::debug!("Rejecting expired token");
            return (state.cookie.clear(jar), ApiError::TokenExpired).into_response();
        }
        Err(e) => {
            tracing::debug!("Ignoring unverifiable token: {}", e);
        }
    }

    next.run(request).await
}
