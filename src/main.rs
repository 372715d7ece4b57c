use duty_roster::{
    api::{self, AppState},
    config::{AppConfig, database, seed::load_seed_config},
    core::seed::seed_initial_data,
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = AppConfig::from_env()
        .inspect_err(|e| error!("Invalid configuration: {}", e))?;
    info!(database_url = %app_config.database_url, "Configuration loaded");

    // 4. Initialize database
    let db = database::create_connection(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database schema ready"))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed personnel and duty types once per start
    match load_seed_config(&app_config.seed_file)? {
        Some(seed) => {
            seed_initial_data(&db, &seed)
                .await
                .inspect_err(|e| error!("Failed to seed initial data: {}", e))?;
        }
        None => info!(
            path = %app_config.seed_file.display(),
            "No seed file found, skipping seeding"
        ),
    }

    // 6. Serve HTTP
    let addr = app_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Duty roster service listening");

    axum::serve(listener, api::router(AppState::new(db))).await?;
    Ok(())
}
