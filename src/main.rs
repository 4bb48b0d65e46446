use anyhow::Result;
use dotenvy::dotenv;
use saheli_backend::{
    routes::{self, AppState},
    AppConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        profile = %config.profile,
        window = config.rules.window_size,
        strategy = %config.strategy,
        "⚙️ Engine configured"
    );

    let app = routes::router(AppState::new(&config));

    tracing::info!("🧠 Server running at {}", config.bind_addr);

    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await?,
        app.into_make_service(),
    )
    .await?;

    Ok(())
}
