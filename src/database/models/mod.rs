pub mod item;
pub mod user;

pub use item::Item;
pub use user::{NewUser, User};
