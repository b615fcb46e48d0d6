//! SQLite-Backend-Implementierung des UserStore

pub mod pool;
pub mod users;

pub use pool::SqliteDb;
