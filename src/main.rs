//! Sheetlink - Main entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sheetlink::config::Config;
use sheetlink::server::{self, AppState};
use sheetlink::tools::ToolRegistry;

#[derive(Parser)]
#[command(name = "sheetlink", version, about = "HTTP tool gateway for Google Sheets and Drive")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP gateway (default).
    Serve,
    /// Print the tool manifest as JSON and exit.
    Manifest,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sheetlink=info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env early so all env-based config resolution sees it.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::from_env()?;
    let registry = ToolRegistry::with_builtin_tools();

    match cli.command {
        Some(Command::Manifest) => {
            let manifest = server::manifest_body(&registry, &config);
            println!("{}", serde_json::to_string_pretty(&manifest)?);
            Ok(())
        }
        None | Some(Command::Serve) => {
            tracing::info!("Starting Sheetlink...");
            if !config.oauth.is_configured() {
                tracing::warn!(
                    "GOOGLE_CLIENT_ID is not set; the manifest will advertise placeholder \
                     OAuth parameters"
                );
            }

            let state = AppState {
                registry: Arc::new(registry),
                config: Arc::new(config.clone()),
            };
            server::serve(&config.server, state).await?;
            Ok(())
        }
    }
}
