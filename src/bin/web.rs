use anyhow::{Context, Result};
use nba_edge::config::Config;
use nba_edge::data::load_snapshot;
use nba_edge::server::{router, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables and settings
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Loading snapshot from {}...", config.snapshot_file.display());

    // Load data on startup
    let snapshot = match load_snapshot(&config.snapshot_file) {
        Ok(snapshot) => {
            println!("Data loaded successfully");
            println!("  - {} Games", snapshot.games.len());
            println!("  - {} Analyses", snapshot.analyses.len());
            println!("  - {} Player Props", snapshot.props.len());
            Some(snapshot)
        }
        Err(e) => {
            error!("Error loading snapshot: {:#}", e);
            eprintln!("Server will start but data endpoints will return 503");
            None
        }
    };

    let app = router(AppState::new(snapshot, &config));

    println!("\nStarting web server at http://{}", config.bind_addr);
    println!("Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
