use std::sync::Arc;

use convo_history::config::AppConfig;
use convo_history::http::{AppState, history_routes};
use convo_history::session::Session;
use convo_history::storage::{JsonFileStorage, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("Conversation History v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Mode: {}", config.session.mode);
    eprintln!("   History file: {}", config.history_file.display());
    match config.session.page_size {
        Some(size) => eprintln!("   Page size: {}", size),
        None => eprintln!("   Page size: unlimited"),
    }
    eprintln!("   API: http://{}/api/messages", config.bind_addr);
    eprintln!("   Export: http://{}/api/export\n", config.bind_addr);

    let storage: Arc<dyn Storage> = Arc::new(
        JsonFileStorage::new(config.history_file.clone()).with_seed(config.session.seed),
    );

    // A corrupt history file stops startup instead of being replaced by the seed.
    let session = Session::open(config.session.clone(), storage).await?;

    let app = history_routes(AppState::new(session, config.snapshot_dir.clone()));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "History server started");
    axum::serve(listener, app).await?;

    Ok(())
}
