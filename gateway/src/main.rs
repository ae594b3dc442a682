use anyhow::Result;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zelonia_sites::layout::BOUNDARY_FILES;

mod config;
mod controls;
mod routes;
mod ui;

use config::{AdminCredentials, GatewayConfig};
use controls::{ControlPanel, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub controls: Arc<RwLock<ControlPanel>>,
    pub sessions: Arc<SessionStore>,
    /// Boundary overlay URLs found in the data directory at startup
    pub boundaries: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(admin: AdminCredentials, boundaries: Vec<String>) -> Self {
        Self {
            controls: Arc::new(RwLock::new(ControlPanel::default())),
            sessions: Arc::new(SessionStore::new(admin)),
            boundaries: Arc::new(boundaries),
        }
    }
}

/// URLs (under `/data`) of the boundary overlays present on disk.
/// Looks in the data directory itself, then in its `Geojsons/` folder.
pub fn discover_boundaries(data_dir: &Path) -> Vec<String> {
    let mut found = Vec::new();
    for name in BOUNDARY_FILES {
        for sub in ["", "Geojsons"] {
            let relative = if sub.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", sub, name)
            };
            if data_dir.join(&relative).is_file() {
                found.push(format!("/data/{}", relative));
                break;
            }
        }
    }
    found
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "zelonia_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;

    let boundaries = discover_boundaries(&config.data_dir);
    if boundaries.is_empty() {
        tracing::warn!(
            "   No boundary overlays in {} - run offset-geojson first",
            config.data_dir.display()
        );
    } else {
        tracing::info!("   Loaded {} boundary overlays", boundaries.len());
    }

    let state = AppState::new(config.admin.clone(), boundaries);

    let app = routes::router(state)
        .nest_service("/data", ServeDir::new(&config.data_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.listen_addr();
    tracing::info!("Zelonia Gateway starting on {}", addr);
    tracing::info!("   Data directory: {}", config.data_dir.display());
    tracing::info!("   Admin user: {}", config.admin.username);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
