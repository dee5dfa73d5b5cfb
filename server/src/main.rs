mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::media::{CloudinaryClient, MediaUploader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env()?;

    // Uploads are optional: the site still serves pages without media credentials.
    let uploader: Option<Arc<dyn MediaUploader>> = match config.media.clone() {
        Some(media) => {
            let client = CloudinaryClient::new(media, config.upload_timeout_secs)?;
            tracing::info!(cloud = client.cloud_name(), "media uploads enabled");
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("media host not configured; uploads disabled");
            None
        }
    };

    let state = state::AppState::new(uploader);
    let app = routes::app(state)?;

    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, "festival listening");
    axum::serve(listener, app).await?;
    Ok(())
}
