use std::sync::Arc;

use ngo_cms_api::config::AppConfig;
use ngo_cms_api::{app, auth, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, CMS_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Fails fast when CMS_JWT_SECRET is missing
    let config = AppConfig::from_env()?;

    std::fs::create_dir_all(&config.uploads_dir)?;
    let pool = db::connect(&config.database_url).await?;

    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        auth::bootstrap_admin(&pool, email, password).await?;
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        db: pool,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("CMS API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
