use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedmirror::app::AppContext;
use feedmirror::cli::{commands, Cli, Commands};
use feedmirror::config::Config;
use feedmirror::domain::Credentials;
use feedmirror::sync::SyncOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let db_path = cli.db.or(config.db_path);
    let workers = cli.workers.unwrap_or(config.sync.workers);
    let ctx = AppContext::with_workers(db_path, workers)?;

    match cli.command {
        Commands::Add {
            name,
            remote_id,
            username,
            password,
        } => {
            let credentials = username
                .zip(password)
                .map(|(username, password)| Credentials { username, password });
            commands::add_source(&ctx, &name, &remote_id, credentials).await?;
        }
        Commands::Remove { name } => {
            commands::remove_source(&ctx, &name).await?;
        }
        Commands::Sync {
            name,
            force,
            max_results,
            json,
        } => {
            let options = SyncOptions {
                force_reload: force,
                max_results: max_results.unwrap_or(config.sync.max_results),
            };
            commands::sync(&ctx, name.as_deref(), options, json).await?;
        }
        Commands::List { entries } => {
            if entries {
                commands::list_entries(&ctx)?;
            } else {
                commands::list_sources(&ctx)?;
            }
        }
    }

    Ok(())
}
