pub mod items;
pub mod manager;
pub mod models;
pub mod store;
pub mod users;

pub use items::SqliteItemStore;
pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Item, NewUser, User};
pub use store::{with_deadline, ItemStore, StoreError, UserStore};
pub use users::SqliteUserStore;
