use std::sync::Arc;

use pronto_core::catalog::StaticMenu;
use pronto_core::config::{AppConfig, ConfigError};
use pronto_core::scheduler::SlotBoard;
use pronto_core::DialogueEngine;
use pronto_db::{connect, migrations, DbPool, SqlOrderSink};
use thiserror::Error;
use tracing::info;

pub type Engine = DialogueEngine<StaticMenu, SqlOrderSink>;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: Arc<StaticMenu>,
    pub engine: Arc<Engine>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(database_url = %config.database.url, "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!("database migrations applied");

    let (window_start, window_end) = config.delivery.window()?;
    let slots = Arc::new(SlotBoard::with_window(
        window_start,
        window_end,
        config.delivery.slot_capacity,
    ));
    info!(
        window_start = %window_start,
        window_end = %window_end,
        slot_capacity = config.delivery.slot_capacity,
        "delivery slot board initialized"
    );

    let catalog = Arc::new(StaticMenu::pizzeria_da_mario());
    let sink = Arc::new(SqlOrderSink::new(db_pool.clone()));
    let engine = Arc::new(DialogueEngine::new(Arc::clone(&catalog), sink, slots));

    Ok(Application { config, db_pool, catalog, engine })
}

#[cfg(test)]
mod tests {
    use pronto_core::config::{
        AppConfig, DatabaseConfig, DeliveryConfig, LogFormat, LoggingConfig, ServerConfig,
    };

    use super::bootstrap_with_config;

    fn test_config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_owned(),
                max_connections: 1,
                timeout_secs: 5,
            },
            server: ServerConfig { bind_address: "127.0.0.1".to_owned(), port: 0 },
            delivery: DeliveryConfig {
                window_start: "19:00".to_owned(),
                window_end: "23:00".to_owned(),
                slot_capacity: 2,
            },
            logging: LoggingConfig { level: "info".to_owned(), format: LogFormat::Compact },
        }
    }

    #[tokio::test]
    async fn bootstrap_connects_migrates_and_builds_the_slot_board() {
        let app = bootstrap_with_config(test_config()).await.expect("bootstrap");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('orders', 'customers')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("schema check");
        assert_eq!(table_count, 2);

        assert_eq!(app.engine.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn bootstrap_rejects_an_inverted_delivery_window() {
        let mut config = test_config();
        config.delivery.window_start = "22:00".to_owned();
        config.delivery.window_end = "19:00".to_owned();

        assert!(bootstrap_with_config(config).await.is_err());
    }
}
