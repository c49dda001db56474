use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, Connection, PgConnection, PgPool};
use tracing::info;

use crate::config::{AppConfig, DbConfig};

/// Creates the waitlist table if it doesn't exist yet. Safe to run on every startup.
const CREATE_WAITLIST_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS waitlist_entries (
        id SERIAL PRIMARY KEY,
        email VARCHAR(255) UNIQUE NOT NULL,
        name VARCHAR(255),
        whatsapp VARCHAR(20),
        notification_preference VARCHAR(20) DEFAULT 'email',
        interest_type VARCHAR(20) DEFAULT 'both',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

#[derive(Clone, Debug)]
pub struct DbManager {
    db: PgPool,
}

impl DbManager {
    pub async fn init(config: &AppConfig) -> Result<Self> {
        info!("{:<20} - Initializing the DB pool", "init_db");

        let con_opts = config.db_config.connection_options();

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_millis(500))
            .connect_with(con_opts)
            .await
            .map_err(|ex| Error::FailToCreatePool(ex.to_string()))?;

        Ok(Self { db: db_pool })
    }

    /// Creates the `waitlist_entries` table.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_WAITLIST_TABLE).execute(&self.db).await?;
        info!("{:<20} - Database schema ready", "init_schema");

        Ok(())
    }

    /// Creates the database named in `db_config` on its server.
    /// Used to give every integration test its own database.
    pub async fn create_database(db_config: &DbConfig) -> Result<()> {
        let mut connection =
            PgConnection::connect_with(&db_config.connection_options_without_db()).await?;

        let sql = format!(r#"CREATE DATABASE "{}";"#, db_config.db_name);
        sqlx::query(&sql).execute(&mut connection).await?;
        connection.close().await?;

        Ok(())
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create db pool: {0}")]
    FailToCreatePool(String),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
