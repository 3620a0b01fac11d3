use clap::Subcommand;

use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create tables if missing")]
    Create {
        #[arg(long, help = "Drop existing tables (and their data) first")]
        drop: bool,
    },

    #[command(about = "Drop all tables")]
    Drop,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;

    match cmd {
        SchemaCommands::Create { drop } => {
            if drop {
                DatabaseManager::drop_schema(&pool).await?;
            }
            DatabaseManager::create_schema(&pool).await?;
            output_success(&output_format, "Schema created", None)
        }
        SchemaCommands::Drop => {
            DatabaseManager::drop_schema(&pool).await?;
            output_success(&output_format, "Schema dropped", None)
        }
    }
}
