use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tracing::info;

use recipe_server::{config::Config, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recipe_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.max_db_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&db_pool).await?;
    info!("database connected, migrations applied");

    let app = create_router(
        db_pool,
        config.image_upload_dir.clone(),
        config.image_base_url.clone(),
        config.jwt_secret.clone(),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
