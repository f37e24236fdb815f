use gymplan::api::routes::create_routes;
use gymplan::config::{run_migrations, AppConfig, DatabaseConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    let db = db_config.create_pool().await?;
    run_migrations(&db).await?;
    info!("Database ready, migrations applied");

    // The router only exists once configuration, the pool and migrations
    // are in place, so every navigation evaluates against initialized state.
    let app = create_routes(db, &app_config.jwt_secret);

    let listener = TcpListener::bind(app_config.server_address()).await?;
    info!("Gymplan server starting on http://{}", app_config.server_address());
    info!("Health check available at http://{}/health", app_config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
