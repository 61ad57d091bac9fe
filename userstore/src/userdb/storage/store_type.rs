use async_trait::async_trait;
use std::sync::Arc;

use crate::storage::Database;
use crate::userdb::{errors::UserError, store::UserStore, types::User};

use super::postgres::*;
use super::sqlite::*;

/// User store backed by the shared relational connection
pub struct SqlUserStore {
    db: Arc<Database>,
}

impl SqlUserStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    /// Create the users table if needed and check its columns
    async fn init(&self) -> Result<(), UserError> {
        let store = self.db.data_store().await?;

        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_user_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_user_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        let store = self.db.data_store().await?;

        let users = if let Some(pool) = store.as_sqlite() {
            get_all_users_sqlite(pool).await
        } else if let Some(pool) = store.as_postgres() {
            get_all_users_postgres(pool).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        if users.is_empty() {
            tracing::debug!("User listing is empty");
            return Err(UserError::NoData);
        }

        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[tracing::instrument(skip(self), fields(user_email = %email))]
    async fn delete_user(&self, email: &str) -> Result<(), UserError> {
        let store = self.db.data_store().await?;

        let deleted = if let Some(pool) = store.as_sqlite() {
            delete_user_sqlite(pool, email).await
        } else if let Some(pool) = store.as_postgres() {
            delete_user_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        if deleted == 0 {
            tracing::info!(found = false, "User delete - not found");
            return Err(UserError::NotFound);
        }
        tracing::info!("User deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self, user), fields(user_email = %user.email))]
    async fn insert_new_user(&self, user: User) -> Result<(), UserError> {
        if user.email.is_empty() {
            tracing::debug!("Ignoring user with empty email");
            return Ok(());
        }

        let store = self.db.data_store().await?;

        let result = if let Some(pool) = store.as_sqlite() {
            insert_user_sqlite(pool, &user).await
        } else if let Some(pool) = store.as_postgres() {
            insert_user_postgres(pool, &user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(()) => tracing::info!("User insert completed"),
            Err(e) => tracing::error!(error = %e, "User insert failed"),
        }

        result
    }

    #[tracing::instrument(skip(self, user), fields(user_email = %user.email))]
    async fn update_user(&self, user: User) -> Result<(), UserError> {
        let store = self.db.data_store().await?;

        let updated = if let Some(pool) = store.as_sqlite() {
            update_user_sqlite(pool, &user).await
        } else if let Some(pool) = store.as_postgres() {
            update_user_postgres(pool, &user).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }?;

        if updated == 0 {
            tracing::info!(found = false, "User update - not found");
            return Err(UserError::NotFound);
        }
        tracing::info!("User update completed");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(user_email = %email))]
    async fn find_user_by_email(&self, email: &str) -> Result<User, UserError> {
        let store = self.db.data_store().await?;

        let result = if let Some(pool) = store.as_sqlite() {
            find_user_sqlite(pool, email).await
        } else if let Some(pool) = store.as_postgres() {
            find_user_postgres(pool, email).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match result {
            Ok(Some(user)) => {
                tracing::info!(found = true, "User lookup completed");
                Ok(user)
            }
            Ok(None) => {
                tracing::info!(found = false, "User lookup completed - not found");
                Err(UserError::NotFound)
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
                Err(e)
            }
        }
    }
}
