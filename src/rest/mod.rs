// Generic verb dispatch and URL registration, independent of any entity.
pub mod context;
pub mod endpoint;
pub mod resource;

pub use context::RequestContext;
pub use endpoint::{HandlerResult, PathParams, Pk, RestEndpoint};
pub use resource::{credentialed_cors, RestResource, RestResources};
