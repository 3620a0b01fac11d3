pub mod password;
pub mod token;
pub mod validate;

pub use password::{hash_password_async, verify_password_async, PasswordError};
pub use token::{Claims, TokenError, TokenKeys};
pub use validate::{escape_html, validate_email_format};
