//! userstore - persistence layer for the user CRUD service
//!
//! The [`UserStore`] trait is the contract HTTP handlers program against.
//! [`InMemoryUserStore`] keeps users in a map and is meant for tests;
//! [`SqlUserStore`] issues statements against a shared PostgreSQL or SQLite
//! connection owned by a [`Database`] context.

mod storage;
mod userdb;

pub use storage::{
    ConnectionState, DB_TABLE_USERS, DataStore, Database, DbConfig, PostgresConfig,
    SharedConnection, SqliteConfig,
};
pub use userdb::{InMemoryUserStore, SqlUserStore, User, UserError, UserStore};
