//! Pulse Widgets - host server for countdown and stack widgets

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pulse_widgets::{
    api::create_router,
    config::Config,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("pulse_widgets={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pulse-widgets server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, max_widgets={}",
          config.host, config.port, config.max_widgets);

    let state = Arc::new(AppState::new(config.port, config.host.clone(), config.max_widgets));
    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /widgets                 - Attach a countdown");
    info!("  GET    /widgets                 - List countdowns");
    info!("  GET    /widgets/:id             - Current countdown view");
    info!("  PUT    /widgets/:id/attributes  - Attribute snapshot (2s drift tolerance)");
    info!("  POST   /widgets/:id/sync        - Authoritative sync");
    info!("  POST   /widgets/:id/initialize  - Reset countdown");
    info!("  DELETE /widgets/:id             - Tear down countdown");
    info!("  GET    /stack/layout            - Coverflow placements");
    info!("  GET    /duration                - Duration picker step");
    info!("  GET    /status, /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received, detaching {} widgets", state.widget_count());
    state.detach_all().await;

    info!("Server shutdown complete");
    Ok(())
}
