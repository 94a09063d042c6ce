//! Measures overlay HTTP server binary.
//!
//! Initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Serve a local JSON fixture
//! REPOSITORY_TYPE=local LOCAL_FIXTURE_PATH=fixtures/overlay.json \
//!   cargo run --bin overlay-server
//!
//! # Proxy a running analysis server
//! ANALYSIS_SERVER_URL=https://sonar.example.com ANALYSIS_SERVER_TOKEN=... \
//!   cargo run --bin overlay-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_CONFIG`: Path to a repository.toml (optional, takes precedence over env)
//! - `REPOSITORY_TYPE`, `ANALYSIS_SERVER_*`, `LOCAL_FIXTURE_PATH`: see `db::factory`
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use measures_overlay::db::{self, RepositoryConfig, RepositoryFactory};
use measures_overlay::http::{create_router, AppState};
use measures_overlay::services::{OverlayContext, OverlayOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting measures overlay server");

    let options = match env::var("REPOSITORY_CONFIG") {
        Ok(path) => {
            let config = RepositoryConfig::from_file(&path)?;
            let repository = RepositoryFactory::from_repository_config(&config).await?;
            db::install_repository(repository);
            info!("Repository configured from {}", path);
            config.overlay_options()
        }
        Err(_) => {
            db::init_repository().await?;
            OverlayOptions::default()
        }
    };
    let repository = Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    let ctx = OverlayContext::new(repository).with_options(options);
    let app = create_router(AppState::with_context(ctx));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
