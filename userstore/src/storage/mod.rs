mod config;
mod connection;
mod database;
mod schema_validation;

pub use config::{DB_TABLE_USERS, DbConfig, PostgresConfig, SqliteConfig};
pub use connection::{ConnectionState, SharedConnection};
pub use database::{DataStore, Database};

pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
