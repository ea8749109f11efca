use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use slotkeeper_core::CoreConfig;

/// Main entry point for the Slotkeeper save-file service
///
/// Loads `.env`, resolves the save directories once and serves the REST API.
///
/// # Environment Variables
/// - `SLOTKEEPER_REST_ADDR`: REST server address (default: "0.0.0.0:8080")
/// - `PLAYERS_DIR`: Directory of active player saves (default: "saves/Players")
/// - `SLOTS_DIR`: Root of per-player slot directories (default: "saves/Slots")
/// - `BACKUP_DIR`: Destination of backups taken before deletes (default: "saves/Backups")
/// - `MAX_READ_BYTES`: Read limit for file content requests (default: 10 MiB)
/// - `SLOT_ID_POLICY`: `overwrite` or `preserve` for transfers (default: "overwrite")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid, the address cannot be bound, or the
///   server fails while running
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("slotkeeper=info".parse()?)
                .add_directive("slotkeeper_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("SLOTKEEPER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let cfg = Arc::new(CoreConfig::from_env()?);

    tracing::info!("++ Starting Slotkeeper REST on {}", addr);
    tracing::info!(
        "Players: {}, slots: {}, backups: {}, slot id policy: {}",
        cfg.players_dir().display(),
        cfg.slots_dir().display(),
        cfg.backup_dir().display(),
        cfg.slot_id_policy().as_str()
    );

    let app = api_rest::router(AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
