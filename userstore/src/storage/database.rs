use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, PgPool, Pool, Postgres, Sqlite, SqlitePool};

use crate::userdb::UserError;

use super::config::{DbConfig, PostgresConfig, SqliteConfig};
use super::connection::{ConnectionState, SharedConnection};

/// A connected relational backend
pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

#[derive(Clone, Debug)]
struct SqliteDataStore {
    pool: SqlitePool,
}

#[derive(Clone, Debug)]
struct PostgresDataStore {
    pool: PgPool,
}

impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}

/// Process-wide database context.
///
/// Build one at startup and hand it to every component needing storage
/// access. The connection is opened on first use and never re-created.
pub struct Database {
    config: DbConfig,
    connection: SharedConnection<Box<dyn DataStore>>,
}

impl Database {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            connection: SharedConnection::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// The shared backend, connecting on the first call
    pub async fn data_store(&self) -> Result<&dyn DataStore, UserError> {
        let store = self
            .connection
            .get_or_connect(|| connect(&self.config))
            .await?;
        Ok(&**store)
    }
}

async fn connect(config: &DbConfig) -> Result<Box<dyn DataStore>, UserError> {
    let target = config.describe();
    tracing::info!("Initializing data store: {}", target);

    let result: Result<Box<dyn DataStore>, UserError> = match config {
        DbConfig::Postgres(pg) => connect_postgres(pg)
            .await
            .map(|pool| Box::new(PostgresDataStore { pool }) as Box<dyn DataStore>),
        DbConfig::Sqlite(sqlite) => connect_sqlite(sqlite)
            .await
            .map(|pool| Box::new(SqliteDataStore { pool }) as Box<dyn DataStore>),
    };

    match &result {
        Ok(_) => tracing::info!("Connected to database: {}", target),
        Err(e) => tracing::error!(error = %e, "Failed to connect to database: {}", target),
    }

    result
}

async fn connect_postgres(config: &PostgresConfig) -> Result<PgPool, UserError> {
    let options = PgConnectOptions::from_str(&config.connection_url())
        .map_err(|e| UserError::Connection(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_lifetime(config.max_lifetime)
        .connect_lazy_with(options);

    if !config.startup_grace.is_zero() {
        tracing::info!(
            "Waiting {}s for the database before the first liveness probe",
            config.startup_grace.as_secs()
        );
        tokio::time::sleep(config.startup_grace).await;
    }

    probe(&pool).await?;
    Ok(pool)
}

async fn connect_sqlite(config: &SqliteConfig) -> Result<SqlitePool, UserError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| UserError::Connection(e.to_string()))?
        .create_if_missing(true);

    let mut pool_options = SqlitePoolOptions::new();
    if config.is_in_memory() {
        // Each connection to `:memory:` is its own database; keep exactly one
        // and never recycle it so the contents live as long as the process.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| UserError::Connection(e.to_string()))?;

    probe(&pool).await?;
    Ok(pool)
}

/// Liveness probe on one pooled connection
async fn probe<DB: sqlx::Database>(pool: &Pool<DB>) -> Result<(), UserError> {
    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| UserError::Connection(e.to_string()))?;
    conn.ping()
        .await
        .map_err(|e| UserError::Connection(e.to_string()))
}
