use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::get_configuration;
use chirpy::startup::run;
use chirpy::store::{InMemoryStore, PgStore, Store};
use chirpy::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let configuration = get_configuration();
    let log_level = configuration
        .as_ref()
        .map(|c| c.application.log_level.as_str())
        .unwrap_or("info");
    if let Err(e) = init_telemetry(log_level) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    tracing::info!("Starting application");

    let configuration = match configuration {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    let store: Arc<dyn Store> = match &configuration.database {
        Some(database) => {
            tracing::info!(host = %database.host, "Attempting to connect to database");

            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.connection_string())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create connection pool: {}", e);
                    std::io::Error::new(
                        std::io::ErrorKind::ConnectionRefused,
                        "Database connection error",
                    )
                })?;

            let store = PgStore::new(pool);
            store.migrate().await.map_err(|e| {
                tracing::error!("Failed to migrate database: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, "Database migration error")
            })?;

            tracing::info!("Database ready");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No database configured, using in-memory store");
            Arc::new(InMemoryStore::new())
        }
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, store, configuration)?;
    server.await
}
