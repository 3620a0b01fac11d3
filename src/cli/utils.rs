use anyhow::Context;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::auth::{escape_html, password::hash_password_async, validate_email_format};
use crate::cli::OutputFormat;
use crate::config::DatabaseConfig;
use crate::database::{DatabaseManager, PgStore, Store, User};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(Value::Object(fields)) = data {
                if let Some(obj) = response.as_object_mut() {
                    obj.extend(fields);
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Pool from `DATABASE_URL` and the database tuning variables
pub async fn connect() -> anyhow::Result<PgPool> {
    let config = DatabaseConfig::from_env().context("database configuration")?;
    Ok(DatabaseManager::connect(&config).await?)
}

/// Create a user exactly as POST /register would store it
pub async fn create_user(store: &PgStore, email: &str, password: &str) -> anyhow::Result<User> {
    let email = escape_html(email);
    validate_email_format(&email).map_err(anyhow::Error::msg)?;
    let hash = hash_password_async(escape_html(password)).await?;
    Ok(store.create_user(&email, &hash).await?)
}
