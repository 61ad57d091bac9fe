//! userstore-axum - HTTP endpoints for the user store
//!
//! Mount [`user_router`] to expose create/read/update/delete operations over
//! any [`userstore::UserStore`].

mod error;
mod extract;
mod user;

pub use error::IntoResponseError;
pub use extract::{EMAIL_FIELD, EmailField, ValidUser};
pub use user::{SharedUserStore, USER_ROUTE, USERS_ROUTE, shared_store, user_router};
