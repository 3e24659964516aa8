pub mod item;
pub mod migrate;
pub mod token;
pub mod user;
