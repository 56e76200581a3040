use anyhow::Context;
use backend::shared::config::load_config;
use backend::shared::data::db;
use backend::shared::state::AppState;
use backend::system::{auth::jwt, initialization};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    backend::system::tracing::initialize()?;

    let config = load_config().context("Failed to load configuration")?;
    tracing::info!(
        "Database: {}, release policy: {:?}",
        config.database.path,
        config.dispatch.release_policy
    );

    let conn = db::connect(&config).await?;

    let jwt_secret = jwt::resolve_jwt_secret(&conn, config.auth.jwt_secret.as_deref())
        .await
        .context("Failed to resolve JWT secret")?;

    initialization::ensure_admin_user_exists(&conn)
        .await
        .context("Failed to create default admin user")?;
    if config.seed.sample_data {
        initialization::seed_sample_data(&conn)
            .await
            .context("Failed to seed sample data")?;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(conn, config, jwt_secret);
    let app = backend::routes::configure_routes(state);

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
