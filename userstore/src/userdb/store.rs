use async_trait::async_trait;

use super::errors::UserError;
use super::types::User;

/// Operations every user storage backend provides.
///
/// Implementations are keyed by email. Every operation takes `&self` and the
/// store synchronizes internally, so one instance can be shared as an
/// `Arc<dyn UserStore>` by concurrent requests.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Prepare the backing medium. Safe to call more than once.
    async fn init(&self) -> Result<(), UserError>;

    /// Return every stored user, or [`UserError::NoData`] when there are none.
    async fn get_all_users(&self) -> Result<Vec<User>, UserError>;

    /// Remove the user with the given email, or [`UserError::NotFound`].
    async fn delete_user(&self, email: &str) -> Result<(), UserError>;

    /// Insert or overwrite the record for `user.email`.
    /// A user with an empty email is ignored.
    async fn insert_new_user(&self, user: User) -> Result<(), UserError>;

    /// Replace name and password of an existing user, keeping `created_at`.
    async fn update_user(&self, user: User) -> Result<(), UserError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, UserError>;
}
