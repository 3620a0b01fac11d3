use clap::Args;
use serde_json::json;

use crate::cli::utils::{connect, create_user, output_success};
use crate::cli::OutputFormat;
use crate::database::{DatabaseManager, ItemDraft, PgStore, Store};

#[derive(Args)]
pub struct SeedArgs {
    #[arg(long, help = "Email of the seeded user")]
    pub email: String,

    #[arg(long, help = "Password of the seeded user")]
    pub password: String,

    #[arg(long, default_value_t = 3, help = "Number of items to create for the user")]
    pub items: u32,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    DatabaseManager::create_schema(&pool).await?;
    let store = PgStore::new(pool);

    let user = create_user(&store, &args.email, &args.password).await?;

    let mut ids = Vec::new();
    for i in 0..args.items {
        let draft = ItemDraft {
            title: format!("Item {}", i),
            text: format!("Seeded item number {}", i),
        };
        ids.push(store.create_item(user.id, &draft).await?.id);
    }

    output_success(
        &output_format,
        &format!("Seeded user {} with {} items", user.email, ids.len()),
        Some(json!({ "user": user, "items": ids })),
    )
}
