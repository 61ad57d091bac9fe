mod errors;
mod memory;
mod storage;
mod store;
mod types;

pub use errors::UserError;
pub use memory::InMemoryUserStore;
pub use storage::SqlUserStore;
pub use store::UserStore;
pub use types::User;
