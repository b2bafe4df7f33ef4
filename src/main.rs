use anyhow::Result;

use photo_wall::{AppConfig, build_router, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env()?;
    let bind_address = config.bind_address();
    tracing::info!(
        upload_dir = %config.upload_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "configuration loaded"
    );

    let router = build_router(config);
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Photo wall server listening on http://{bind_address}");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
