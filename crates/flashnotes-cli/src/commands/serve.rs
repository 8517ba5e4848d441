//! The `flashnotes serve` command.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use flashnotes_core::traits::FlashcardStore;
use flashnotes_core::FlashcardPipeline;
use flashnotes_providers::config::load_config_from;
use flashnotes_providers::{create_generator, create_store};

use crate::server::{self, AppState};

pub async fn execute(
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let host = host.unwrap_or(config.server.host);
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid host address: '{host}'"))?;
    let addr = SocketAddr::new(ip, port.unwrap_or(config.server.port));
    let static_dir = static_dir.unwrap_or(config.server.static_dir);

    if !static_dir.join("index.html").exists() {
        warn!(dir = %static_dir.display(), "no index.html in static directory");
    }

    let generator = create_generator(&config.generation)?;
    let store = create_store(&config.store)?;
    info!(
        models = ?config.generation.models,
        store = store.name(),
        "flashnotes configured"
    );

    let state = AppState {
        pipeline: FlashcardPipeline::new(Arc::from(generator)),
        store: Arc::from(store),
    };

    server::run(server::build_router(state, &static_dir), addr).await
}
