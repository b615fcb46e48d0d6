//! wordcraft-db – Datenbank-Abstraktion
//!
//! Stellt den `UserStore`-Trait bereit, ueber den der Auth-Service auf
//! Benutzerkonten zugreift, sowie die SQLite-Implementierung mit
//! eingebetteten Migrationen.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::{DbError, DbResult};
pub use models::{BenutzerRecord, NeuerBenutzer};
pub use repository::{DatabaseConfig, UserStore};
pub use sqlite::SqliteDb;
