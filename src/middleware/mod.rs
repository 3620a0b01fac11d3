pub mod identity;
pub mod response;

pub use identity::{identity_middleware, CookieSettings, Identity, IdentityState};
pub use response::ApiResponse;
