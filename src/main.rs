use std::sync::Arc;

use qr_bot::render::Compositor;
use qr_bot::{Config, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "qr_bot=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Resolve the label font chain once, up front
    let compositor = Compositor::new(config.label_font_path.as_deref());

    let config = Arc::new(config);
    qr_bot::bot::run_bot(config, compositor).await;

    Ok(())
}
