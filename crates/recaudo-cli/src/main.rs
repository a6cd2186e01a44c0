use anyhow::Result;
use clap::{Parser, Subcommand};
use recaudo_web::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "recaudo-cli")]
#[command(about = "Collector reconciliation back office")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run pending database migrations and exit.
    Migrate,
    /// Start the HTTP API.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Migrate => {
            let pool = recaudo_storage::connect(&config.database_url).await?;
            recaudo_storage::run_migrations(&pool).await?;
            println!("migrations applied");
        }
        Commands::Serve => {
            let pool = recaudo_storage::connect(&config.database_url).await?;
            recaudo_storage::run_migrations(&pool).await?;
            recaudo_web::serve(AppState::new(pool, config)).await?;
        }
    }

    Ok(())
}
