use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::errors::UserError;
use super::store::UserStore;
use super::types::User;

/// User store backed by a map keyed by email. Nothing survives a restart.
///
/// Readers share the lock; inserts, updates and deletes take it exclusively.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory user store");
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn init(&self) -> Result<(), UserError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        let users = self.users.read().await;
        if users.is_empty() {
            return Err(UserError::NoData);
        }
        Ok(users.values().cloned().collect())
    }

    async fn delete_user(&self, email: &str) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(email)
            .map(|_| ())
            .ok_or(UserError::NotFound)
    }

    async fn insert_new_user(&self, user: User) -> Result<(), UserError> {
        if user.email.is_empty() {
            tracing::debug!("Ignoring user with empty email");
            return Ok(());
        }
        self.users.write().await.insert(user.email.clone(), user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> Result<(), UserError> {
        let mut users = self.users.write().await;
        let existing = users.get_mut(&user.email).ok_or(UserError::NotFound)?;
        existing.name = user.name;
        existing.password = user.password;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.users
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or(UserError::NotFound)
    }
}
