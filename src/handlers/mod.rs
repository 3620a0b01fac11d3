pub mod authenticate;
pub mod health;
pub mod items;
pub mod register;

pub use authenticate::AuthenticateEndpoint;
pub use health::HealthEndpoint;
pub use items::{ItemDetailEndpoint, ItemListEndpoint};
pub use register::RegisterEndpoint;
