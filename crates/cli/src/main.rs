use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use oneiro_auth::AuthClient;
use oneiro_core::{ResponseMode, env_flag};
use oneiro_http::{AppState, create_router};
use oneiro_llm::LlmClient;
use oneiro_service::{InterpretationService, JournalService};
use oneiro_storage::{PgStorage, RecordStore};

#[derive(Parser)]
#[command(name = "oneiro")]
#[command(about = "Dream-journal interpretation server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve {
        #[arg(short, long, default_value = "8787")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Connect to the database and apply migrations, then exit.
    Migrate,
}

fn database_url() -> Result<String> {
    std::env::var("ONEIRO_DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("ONEIRO_DATABASE_URL environment variable must be set"))
}

fn auth_base_url() -> Result<String> {
    std::env::var("ONEIRO_AUTH_URL")
        .map_err(|_| anyhow::anyhow!("ONEIRO_AUTH_URL environment variable must be set"))
}

fn response_mode() -> ResponseMode {
    oneiro_core::env_parse_with_default("ONEIRO_RESPONSE_MODE", ResponseMode::Narrative)
}

/// The gateway is optional: without a key the server still runs and
/// serves the canned fallback interpretation.
fn build_gateway() -> Result<Option<Arc<LlmClient>>> {
    match std::env::var("ONEIRO_LLM_API_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            let base_url = std::env::var("ONEIRO_LLM_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_owned());
            Ok(Some(Arc::new(LlmClient::new(key, base_url)?)))
        },
        _ => {
            tracing::warn!(
                "ONEIRO_LLM_API_KEY is not set; serving fallback interpretations only"
            );
            Ok(None)
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => {
            let storage = Arc::new(PgStorage::new(&database_url()?).await?);
            let store: Arc<dyn RecordStore> = storage;

            let auth = Arc::new(AuthClient::new(
                auth_base_url()?,
                std::env::var("ONEIRO_AUTH_ANON_KEY").ok(),
            )?);
            let gateway = build_gateway()?;
            let mode = response_mode();
            tracing::info!(mode = mode.as_str(), "response mode selected");

            let state = Arc::new(AppState {
                interpretation: Arc::new(InterpretationService::new(
                    Arc::clone(&auth),
                    Arc::clone(&store),
                    gateway,
                    mode,
                )),
                journal: Arc::new(JournalService::new(auth, store)),
                dev_errors: env_flag("ONEIRO_DEV_ERRORS"),
            });

            let router = create_router(state);
            let addr = format!("{host}:{port}");
            tracing::info!("Starting HTTP server on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        },
        Commands::Migrate => {
            PgStorage::new(&database_url()?).await?;
            tracing::info!("Migrations applied");
        },
    }

    Ok(())
}
