use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waypost_api::config::ServerConfig;
use waypost_api::router::build_app_router;
use waypost_api::state::AppState;
use waypost_api::storage::LocalBlobStore;
use waypost_db::repositories::UserRepo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypost_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = waypost_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    waypost_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    waypost_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Admin bootstrap ---
    bootstrap_admin(&pool).await?;

    // --- Blob store ---
    let blob_store = Arc::new(LocalBlobStore::new(config.blob_store_path.clone()));
    tracing::info!(path = %config.blob_store_path.display(), "Blob store ready");

    // --- App state / router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid HOST/PORT combination")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;
    Ok(())
}

/// Seed the first admin account on an empty users table.
///
/// Controlled by `ADMIN_EMAIL` / `ADMIN_PASSWORD`; skipped when either is
/// unset or any account already exists.
async fn bootstrap_admin(pool: &waypost_db::DbPool) -> anyhow::Result<()> {
    let (email, password) = match (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => (email, password),
        _ => return Ok(()),
    };

    if UserRepo::count(pool).await? > 0 {
        return Ok(());
    }

    let password_hash = waypost_api::auth::password::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Failed to hash bootstrap password: {e}"))?;
    let user = UserRepo::create(pool, &email, &password_hash, "Administrator", "admin").await?;
    tracing::info!(user_id = user.id, email = %email, "Bootstrap admin account created");
    Ok(())
}
