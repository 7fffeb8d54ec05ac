//! Newsdesk
//!
//! News publishing site with reader comments.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk_kernel::config::Config;
use newsdesk_kernel::models::{CreateNews, CreateUser, News, User};
use newsdesk_kernel::state::AppState;
use newsdesk_kernel::{routes, session};

#[derive(Parser)]
#[command(name = "newsdesk", version, about = "News site with reader comments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,

    /// Create a user account.
    CreateUser {
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Publish a news item dated now.
    AddNews {
        title: String,
        #[arg(long, default_value = "")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, state).await,
        Command::CreateUser { username, password } => {
            let user = User::create(state.db(), CreateUser { username, password }).await?;
            info!(user_id = user.id, username = %user.username, "user created");
            Ok(())
        }
        Command::AddNews { title, text } => {
            let news = News::create(
                state.db(),
                CreateNews {
                    title,
                    text,
                    date: None,
                },
            )
            .await?;
            info!(news_id = news.id, title = %news.title, "news published");
            Ok(())
        }
    }
}

async fn serve(config: Config, state: AppState) -> Result<()> {
    info!(port = config.port, "Starting Newsdesk");

    let session_store = session::create_session_store(state.db().clone()).await?;
    let cleanup = session::spawn_expired_session_cleanup(session_store.clone());
    let session_layer = session::create_session_layer(&config, session_store);
    let app = routes::app(state, session_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    cleanup.abort();
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
