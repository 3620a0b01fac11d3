use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{connect, create_user, output_success};
use crate::cli::OutputFormat;
use crate::database::PgStore;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user account")]
    Create {
        #[arg(long, help = "Email address (login name)")]
        email: String,

        #[arg(long, help = "Plaintext password; stored hashed")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Create { email, password } => {
            let store = PgStore::new(connect().await?);
            let user = create_user(&store, &email, &password).await?;
            output_success(
                &output_format,
                &format!("Created user {} ({})", user.email, user.id),
                Some(json!({ "user": user })),
            )
        }
    }
}
